use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the database layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// The configured database file could not be opened.
    #[error("failed to open database at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A `user` row with this username already exists.
    #[error("username {0:?} is already registered")]
    UsernameTaken(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
