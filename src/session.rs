//! Editing-session glue: the load and save paths, and the `flush` capability
//! the editing surface calls at its trigger points (blur, explicit save, tab
//! close, ...).
//!
//! Storage belongs to the collaborator behind [`NoteStore`]. The session only
//! decides whether a flush has anything new to store.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::Config;
use crate::codec;
use crate::cursor::{self, Position};
use crate::error::{BoxError, Error, Result};
use crate::normalize::normalize;
use crate::parser;
use crate::render::blocks_to_tree;
use crate::serialize::tree_to_markup;
use crate::tree::Node;

/// A persisted note ready for the editing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedNote {
    pub title: String,
    pub tree: Node,
}

/// Load path: persisted string to title and editable tree.
pub fn load_with_config(persisted: &str, config: &Config) -> LoadedNote {
    let parts = codec::split(persisted);
    let blocks = parser::parse(&parts.body);
    LoadedNote {
        title: parts.title,
        tree: blocks_to_tree(&blocks, &config.markup),
    }
}

/// Save path: title and (possibly messy) edited tree to the persisted string.
pub fn save_with_config(title: &str, tree: &Node, config: &Config) -> String {
    let canonical = normalize(tree.clone());
    let body = tree_to_markup(&canonical, &config.markup);
    codec::combine(title, &body)
}

/// Why the editing surface asked for a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushReason {
    /// The editor lost focus.
    Blur,
    /// The user pressed the save button.
    ExplicitSave,
    /// A save shortcut was intercepted.
    Shortcut,
    TabClose,
    WindowBlur,
    VisibilityHidden,
    Navigation,
}

impl FlushReason {
    /// Forcing reasons ignore the debounce window: the user asked for it, or
    /// the page is about to go away.
    pub fn is_forcing(self) -> bool {
        matches!(
            self,
            FlushReason::ExplicitSave
                | FlushReason::Shortcut
                | FlushReason::TabClose
                | FlushReason::Navigation
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    Saved,
    /// Nothing changed since the last store.
    Unchanged,
    /// A store happened too recently; the content is still pending.
    Debounced,
}

/// Single capability the editing surface calls at its trigger points.
pub trait Flush {
    fn flush(&mut self, reason: FlushReason) -> Result<FlushOutcome>;
}

/// Where persisted notes go. Implemented by the collaborator.
pub trait NoteStore {
    fn store(&mut self, persisted: &str) -> std::result::Result<(), BoxError>;
}

impl<F> NoteStore for F
where
    F: FnMut(&str) -> std::result::Result<(), BoxError>,
{
    fn store(&mut self, persisted: &str) -> std::result::Result<(), BoxError> {
        self(persisted)
    }
}

/// One note being edited.
pub struct EditSession<S> {
    store: S,
    config: Config,
    title: String,
    tree: Node,
    last_saved: String,
    last_store: Option<Instant>,
}

impl<S: NoteStore> EditSession<S> {
    pub fn open(store: S, persisted: &str, config: Config) -> Self {
        let loaded = load_with_config(persisted, &config);
        // Saving an untouched note must not count as a change.
        let last_saved = save_with_config(&loaded.title, &loaded.tree, &config);
        Self {
            store,
            config,
            title: loaded.title,
            tree: loaded.tree,
            last_saved,
            last_store: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// The tree for the editing surface to mutate.
    pub fn tree_mut(&mut self) -> &mut Node {
        &mut self.tree
    }

    pub fn replace_tree(&mut self, tree: Node) {
        self.tree = tree;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The persisted form of the current title and tree.
    pub fn snapshot(&self) -> String {
        save_with_config(&self.title, &self.tree, &self.config)
    }

    pub fn is_dirty(&self) -> bool {
        self.snapshot() != self.last_saved
    }

    /// Flush with an explicit clock reading.
    pub fn flush_at(&mut self, reason: FlushReason, now: Instant) -> Result<FlushOutcome> {
        let persisted = self.snapshot();
        if persisted == self.last_saved {
            return Ok(FlushOutcome::Unchanged);
        }

        let debounce = self.config.autosave.debounce();
        if !reason.is_forcing() && within(self.last_store, now, debounce) {
            log::debug!("flush on {:?} debounced", reason);
            return Ok(FlushOutcome::Debounced);
        }

        if let Err(e) = self.store.store(&persisted) {
            log::warn!("storing note on {:?} failed: {}", reason, e);
            return Err(Error::Store(e));
        }

        log::info!("stored note on {:?} ({} bytes)", reason, persisted.len());
        self.last_saved = persisted;
        self.last_store = Some(now);
        Ok(FlushOutcome::Saved)
    }

    /// Replace the note with a freshly persisted version (for example after a
    /// save elsewhere) and carry a cursor over by text offset.
    ///
    /// Returns the cursor's new position, or the end of the content when the
    /// old position no longer fits.
    pub fn reload(&mut self, persisted: &str, cursor: Option<&Position>) -> Position {
        let offset = cursor
            .and_then(|position| cursor::text_offset_of(&self.tree, &position.path, position.offset));

        let loaded = load_with_config(persisted, &self.config);
        self.last_saved = save_with_config(&loaded.title, &loaded.tree, &self.config);
        self.title = loaded.title;
        self.tree = loaded.tree;

        match offset {
            Some(offset) => cursor::locate(&self.tree, offset),
            None => cursor::end_of(&self.tree),
        }
    }
}

impl<S: NoteStore> Flush for EditSession<S> {
    fn flush(&mut self, reason: FlushReason) -> Result<FlushOutcome> {
        self.flush_at(reason, Instant::now())
    }
}

fn within(last: Option<Instant>, now: Instant, window: Duration) -> bool {
    last.is_some_and(|last| now.saturating_duration_since(last) < window)
}
