//! Transcoder between the persisted note markup dialect and the editable
//! document tree of a rich-text surface.
//!
//! Load path: [`load`] splits off the title, [`parse`]s the body and renders
//! the blocks into a [`Node`] tree. Save path: [`save`] normalizes the edited
//! tree, serializes it back to markup and joins it with the title.
//!
//! [`import_markdown`] is a separate one-way converter from CommonMark into
//! dialect blocks; it is not part of either path.

mod block;
pub mod codec;
mod config;
pub mod cursor;
mod error;
mod import;
mod inline;
mod normalize;
mod parser;
mod render;
mod serialize;
mod session;
pub mod tree;

pub use block::{Block, Span, spans_plain_text};
pub use codec::{TitleBody, combine, split};
pub use config::{AutosaveConfig, Config, LogConfig, MarkupConfig};
pub use cursor::Position;
pub use error::{BoxError, Error, Result};
pub use import::import_markdown;
pub use inline::{parse_inline, spans_to_markup};
pub use session::{
    EditSession, Flush, FlushOutcome, FlushReason, LoadedNote, NoteStore, load_with_config,
    save_with_config,
};
pub use tree::{Element, Node, Tag};

/// Parse note markup into a vector of blocks.
pub fn parse(markup: &str) -> Vec<Block> {
    parser::parse(markup)
}

/// Render blocks into an editable tree using default config.
pub fn render(blocks: &[Block]) -> Node {
    render_with_config(blocks, &Config::compiled_default())
}

/// Render blocks into an editable tree with custom config.
pub fn render_with_config(blocks: &[Block], config: &Config) -> Node {
    render::blocks_to_tree(blocks, &config.markup)
}

/// Bring an edited tree into canonical form.
pub fn normalize(tree: Node) -> Node {
    normalize::normalize(tree)
}

/// Convert a canonical tree to note markup using default config.
pub fn serialize(tree: &Node) -> String {
    serialize_with_config(tree, &Config::compiled_default())
}

/// Convert a canonical tree to note markup with custom config.
pub fn serialize_with_config(tree: &Node, config: &Config) -> String {
    serialize::tree_to_markup(tree, &config.markup)
}

/// Convert blocks to note markup using default config.
pub fn serialize_blocks(blocks: &[Block]) -> String {
    serialize::blocks_to_markup(blocks, &Config::compiled_default().markup)
}

/// Load a persisted note using default config.
pub fn load(persisted: &str) -> LoadedNote {
    load_with_config(persisted, &Config::compiled_default())
}

/// Save a title and edited tree using default config.
pub fn save(title: &str, tree: &Node) -> String {
    save_with_config(title, tree, &Config::compiled_default())
}

#[cfg(test)]
mod proptests;
