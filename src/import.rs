//! One-way import of general CommonMark into the note dialect.
//!
//! Notes pasted or imported from elsewhere are full Markdown. Everything the
//! dialect can express is kept; the rest is flattened to plain paragraphs
//! (code blocks, tables) or dropped (rules, raw HTML).
//!
//! This sits outside the load/save cycle. It only produces dialect blocks and
//! never widens what [`parse`](crate::parse) accepts; saved notes are always
//! read back by the dialect parser.

use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::block::{Block, Span};
use crate::inline::spans_to_markup;

/// Strip YAML frontmatter from the beginning of markdown content
fn strip_frontmatter(markdown: &str) -> &str {
    if !markdown.starts_with("---") {
        return markdown;
    }
    // Find the closing ---
    if let Some(end) = markdown[3..].find("\n---") {
        // Skip past the closing --- and any trailing newline
        let after_frontmatter = &markdown[3 + end + 4..];
        after_frontmatter.trim_start_matches('\n')
    } else {
        markdown
    }
}

/// Import CommonMark text as dialect blocks.
pub fn import_markdown(markdown: &str) -> Vec<Block> {
    let markdown = strip_frontmatter(markdown);
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options).into_offset_iter();
    let mut state = ImportState::default();

    for (event, range) in parser {
        process_event(event, range, markdown, &mut state);
    }

    log::debug!("imported {} bytes of markdown into {} blocks", markdown.len(), state.blocks.len());
    state.blocks
}

#[derive(Default)]
struct ImportState {
    blocks: Vec<Block>,

    // Current inline content being built
    spans: Vec<Span>,
    // Open inline formatting, each with the spans of its parent
    frames: Vec<Frame>,

    // Current heading level (if in a heading)
    heading_level: Option<u8>,

    // Code block state
    in_code_block: bool,
    code_content: String,

    // List state
    list_stack: Vec<ListBuilder>,

    // Table state
    in_table: bool,
    current_row: Vec<String>,
}

#[derive(Clone, Copy)]
enum FrameKind {
    Bold,
    Italic,
    Underline,
    /// Links, strikethrough, images: keep the text, drop the wrapper.
    Transparent,
}

struct Frame {
    kind: FrameKind,
    parent: Vec<Span>,
}

struct ListBuilder {
    /// Index of the next item of an ordered list.
    next_index: Option<u64>,
    item_spans: Vec<Span>,
    item_checked: Option<bool>,
    /// Set once the item was written out early because a nested list began.
    item_emitted: bool,
}

impl ImportState {
    /// Top-level blocks are separated by one blank line, as in the source.
    fn begin_block(&mut self) {
        if self.list_stack.is_empty() && !self.blocks.is_empty() {
            self.blocks.push(Block::BlankLine);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Span::Text(last)) = self.spans.last_mut() {
            last.push_str(text);
        } else {
            self.spans.push(Span::Text(text.to_string()));
        }
    }

    fn open_frame(&mut self, kind: FrameKind) {
        let parent = std::mem::take(&mut self.spans);
        self.frames.push(Frame { kind, parent });
    }

    fn close_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let inner = std::mem::replace(&mut self.spans, frame.parent);
        if inner.is_empty() {
            return;
        }
        let wrapped = match frame.kind {
            FrameKind::Bold => Span::Bold(inner),
            FrameKind::Italic => Span::Italic(inner),
            FrameKind::Underline => Span::Underline(inner),
            FrameKind::Transparent => {
                for span in inner {
                    match span {
                        Span::Text(text) => self.push_text(&text),
                        other => self.spans.push(other),
                    }
                }
                return;
            }
        };
        self.spans.push(wrapped);
    }

    /// Write out the current list item of the innermost list.
    fn emit_item(&mut self) {
        let pending = std::mem::take(&mut self.spans);
        let Some(list) = self.list_stack.last_mut() else {
            return;
        };
        list.item_spans.extend(pending);
        let text = spans_to_markup(&std::mem::take(&mut list.item_spans))
            .trim()
            .to_string();

        if list.item_emitted {
            // Content following a nested list.
            if !text.is_empty() {
                self.blocks.push(Block::paragraph(text));
            }
            return;
        }
        list.item_emitted = true;

        let block = match (list.item_checked.take(), list.next_index.as_mut()) {
            (Some(checked), _) => Block::CheckboxItem { checked, text },
            (None, Some(next)) => {
                let index = u32::try_from(*next).unwrap_or(u32::MAX);
                *next += 1;
                Block::NumberedItem { index, text }
            }
            (None, None) => Block::BulletItem { text },
        };
        self.blocks.push(block);
    }

    fn emit_paragraph(&mut self) {
        let content = std::mem::take(&mut self.spans);
        if !content.is_empty() {
            self.blocks.push(Block::Paragraph { content });
        }
    }
}

fn process_event(event: Event, range: Range<usize>, source: &str, state: &mut ImportState) {
    match event {
        // Headings
        Event::Start(Tag::Heading { level, .. }) => {
            state.begin_block();
            state.heading_level = Some(heading_level_to_u8(level));
        }
        Event::End(TagEnd::Heading(_)) => {
            if let Some(level) = state.heading_level.take() {
                let content = std::mem::take(&mut state.spans);
                // An empty heading would only be a placeholder.
                if !content.is_empty() {
                    state.blocks.push(Block::Heading { level, content });
                }
            }
        }

        // Paragraphs
        Event::Start(Tag::Paragraph) => {
            if !state.in_table {
                state.begin_block();
            }
        }
        Event::End(TagEnd::Paragraph) => {
            // If we're in a list item, add to that instead
            if let Some(list) = state.list_stack.last_mut() {
                let content = std::mem::take(&mut state.spans);
                if !list.item_spans.is_empty() && !content.is_empty() {
                    list.item_spans.push(Span::Text(" ".to_string()));
                }
                list.item_spans.extend(content);
            } else if !state.in_table {
                state.emit_paragraph();
            }
        }

        // Text content
        Event::Text(text) => {
            if state.in_code_block {
                state.code_content.push_str(&text);
            } else {
                state.push_text(&text);
            }
        }
        Event::Code(code) => state.push_text(&code),

        // Bold, or underline when written with underscores
        Event::Start(Tag::Strong) => {
            let kind = if source[range.start..].starts_with("__") {
                FrameKind::Underline
            } else {
                FrameKind::Bold
            };
            state.open_frame(kind);
        }
        Event::Start(Tag::Emphasis) => state.open_frame(FrameKind::Italic),
        Event::Start(Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }) => {
            state.open_frame(FrameKind::Transparent);
        }
        Event::End(
            TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image,
        ) => state.close_frame(),

        // Code blocks become one paragraph per line
        Event::Start(Tag::CodeBlock(_)) => {
            state.begin_block();
            state.in_code_block = true;
            state.code_content.clear();
        }
        Event::End(TagEnd::CodeBlock) => {
            state.in_code_block = false;
            let content = std::mem::take(&mut state.code_content);
            for line in content.lines() {
                if line.trim().is_empty() {
                    state.blocks.push(Block::BlankLine);
                } else {
                    state.blocks.push(Block::paragraph(line));
                }
            }
        }

        // Lists are flattened; nesting is not part of the dialect
        Event::Start(Tag::List(first_index)) => {
            if state.list_stack.is_empty() {
                state.begin_block();
            } else {
                state.emit_item();
            }
            state.list_stack.push(ListBuilder {
                next_index: first_index,
                item_spans: Vec::new(),
                item_checked: None,
                item_emitted: false,
            });
        }
        Event::End(TagEnd::List(_)) => {
            state.list_stack.pop();
        }

        Event::Start(Tag::Item) => {
            if let Some(list) = state.list_stack.last_mut() {
                list.item_spans.clear();
                list.item_checked = None;
                list.item_emitted = false;
            }
        }
        Event::End(TagEnd::Item) => state.emit_item(),

        // Task list checkboxes
        Event::TaskListMarker(checked) => {
            if let Some(list) = state.list_stack.last_mut() {
                list.item_checked = Some(checked);
            }
        }

        // Tables become one paragraph per row
        Event::Start(Tag::Table(_)) => {
            state.begin_block();
            state.in_table = true;
        }
        Event::End(TagEnd::Table) => {
            state.in_table = false;
        }
        Event::Start(Tag::TableHead | Tag::TableRow) => {
            state.current_row.clear();
        }
        Event::End(TagEnd::TableHead | TagEnd::TableRow) => {
            let row = std::mem::take(&mut state.current_row).join(" | ");
            if !row.trim().is_empty() {
                state.blocks.push(Block::paragraph(row));
            }
        }
        Event::Start(Tag::TableCell) => {
            state.spans.clear();
        }
        Event::End(TagEnd::TableCell) => {
            let cell = std::mem::take(&mut state.spans);
            state.current_row.push(spans_to_markup(&cell).trim().to_string());
        }

        // Soft/hard breaks
        Event::SoftBreak => state.push_text(" "),
        Event::HardBreak => {
            if state.list_stack.is_empty()
                && state.heading_level.is_none()
                && state.frames.is_empty()
                && !state.in_table
            {
                state.emit_paragraph();
            } else {
                state.push_text(" ");
            }
        }

        // Rules, raw HTML, footnotes and the like have no counterpart
        _ => {}
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        _ => 3,
    }
}
