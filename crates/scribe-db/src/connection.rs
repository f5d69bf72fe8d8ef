use rusqlite::Connection;
use tracing::warn;

use crate::{Database, DbError};

/// The one connection belonging to an in-flight request.
///
/// Opened lazily on the first [`get`](Self::get) and reused by every later
/// call in the same request. [`close`](Self::close) runs at teardown; if a
/// request never reaches teardown, `Drop` closes the connection instead.
pub struct RequestConnection {
    db: Database,
    conn: Option<Connection>,
}

impl RequestConnection {
    pub fn new(db: Database) -> Self {
        Self { db, conn: None }
    }

    pub fn get(&mut self) -> Result<&Connection, DbError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.db.connect()?,
        };
        Ok(self.conn.insert(conn))
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Close the connection if one was opened. No-op otherwise.
    pub fn close(&mut self) -> Result<(), DbError> {
        match self.conn.take() {
            Some(conn) => self.db.release(conn),
            None => Ok(()),
        }
    }
}

impl Drop for RequestConnection {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close request connection: {}", e);
        }
    }
}
