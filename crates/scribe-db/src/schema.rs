use rusqlite::Connection;
use tracing::info;

use crate::DbError;

/// The fixed schema. Drops and recreates both tables.
pub const SCHEMA: &str = include_str!("schema.sql");

pub fn apply(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    info!("Database schema initialized");
    Ok(())
}
