//! Error types for notemark.
//!
//! The transcoder itself is total; these errors only come from the edges:
//! reading files, decoding config or JSON, and the note store behind an
//! [`EditSession`](crate::EditSession).

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by a [`NoteStore`](crate::NoteStore).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for notemark operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The collaborator's store rejected a flush.
    #[error("note store failed: {0}")]
    Store(#[source] BoxError),
}
