pub mod connection;
pub mod error;
pub mod models;
pub mod queries;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rusqlite::Connection;
use tracing::{debug, info};

pub use connection::RequestConnection;
pub use error::DbError;

/// Handle to the configured database file.
///
/// Cheap to clone. It holds no connection itself: every request opens its
/// own through a [`RequestConnection`] and closes it at teardown.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

struct DatabaseInner {
    path: PathBuf,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// Connection counters, used to check that no request leaks a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStats {
    pub opened: usize,
    pub closed: usize,
}

impl ConnectionStats {
    pub fn live(&self) -> usize {
        self.opened.saturating_sub(self.closed)
    }
}

impl Database {
    /// Record the database path and make sure it can be opened.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let path = path.into();

        // Probe once so an unreachable path fails at startup, not on the first request
        let probe = open_file(&path)?;
        drop(probe);

        info!("Database configured at {}", path.display());
        Ok(Self {
            inner: Arc::new(DatabaseInner {
                path,
                opened: AtomicUsize::new(0),
                closed: AtomicUsize::new(0),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Open a new connection against the database file.
    pub fn connect(&self) -> Result<Connection, DbError> {
        let conn = open_file(&self.inner.path)?;
        let opened = self.inner.opened.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Opened database connection #{}", opened);
        Ok(conn)
    }

    /// Close a connection obtained from [`Database::connect`].
    pub fn release(&self, conn: Connection) -> Result<(), DbError> {
        let closed = self.inner.closed.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Closing database connection #{}", closed);
        conn.close().map_err(|(_, e)| DbError::Sqlite(e))
    }

    pub fn stats(&self) -> ConnectionStats {
        ConnectionStats {
            opened: self.inner.opened.load(Ordering::SeqCst),
            closed: self.inner.closed.load(Ordering::SeqCst),
        }
    }

    /// Drop and recreate every table.
    pub fn init_schema(&self) -> Result<(), DbError> {
        let conn = self.connect()?;
        let result = schema::apply(&conn);
        self.release(conn)?;
        result
    }
}

fn open_file(path: &Path) -> Result<Connection, DbError> {
    let conn = Connection::open(path).map_err(|source| DbError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}
