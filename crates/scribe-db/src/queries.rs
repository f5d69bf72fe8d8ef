use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use scribe_types::models::Post;

use crate::DbError;
use crate::models::UserRow;

const POST_COLUMNS: &str = "SELECT p.id, title, body, created, author_id, username
     FROM post p JOIN user u ON p.author_id = u.id";

// -- Users --

/// Insert a user and return its id. A duplicate username maps to
/// [`DbError::UsernameTaken`].
pub fn create_user(conn: &Connection, username: &str, password_hash: &str) -> Result<i64, DbError> {
    let result = write(conn, |tx| {
        tx.execute(
            "INSERT INTO user (username, password) VALUES (?1, ?2)",
            params![username, password_hash],
        )?;
        Ok(tx.last_insert_rowid())
    });

    match result {
        Err(DbError::Sqlite(e)) if is_unique_violation(&e) => {
            Err(DbError::UsernameTaken(username.to_string()))
        }
        other => other,
    }
}

pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>, DbError> {
    let row = conn
        .query_row(
            "SELECT id, username, password FROM user WHERE username = ?1",
            [username],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>, DbError> {
    let row = conn
        .query_row(
            "SELECT id, username, password FROM user WHERE id = ?1",
            [id],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

// -- Posts --

/// All posts, most recent first.
pub fn list_posts(conn: &Connection) -> Result<Vec<Post>, DbError> {
    let mut stmt = conn.prepare(&format!("{POST_COLUMNS} ORDER BY created DESC, p.id DESC"))?;
    let rows = stmt
        .query_map([], post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_post(conn: &Connection, id: i64) -> Result<Option<Post>, DbError> {
    let row = conn
        .query_row(&format!("{POST_COLUMNS} WHERE p.id = ?1"), [id], post_from_row)
        .optional()?;
    Ok(row)
}

pub fn create_post(conn: &Connection, title: &str, body: &str, author_id: i64) -> Result<i64, DbError> {
    write(conn, |tx| {
        tx.execute(
            "INSERT INTO post (title, body, author_id) VALUES (?1, ?2, ?3)",
            params![title, body, author_id],
        )?;
        Ok(tx.last_insert_rowid())
    })
}

pub fn update_post(conn: &Connection, id: i64, title: &str, body: &str) -> Result<(), DbError> {
    write(conn, |tx| {
        tx.execute(
            "UPDATE post SET title = ?1, body = ?2 WHERE id = ?3",
            params![title, body, id],
        )?;
        Ok(())
    })
}

pub fn delete_post(conn: &Connection, id: i64) -> Result<(), DbError> {
    write(conn, |tx| {
        tx.execute("DELETE FROM post WHERE id = ?1", [id])?;
        Ok(())
    })
}

/// Run one write in its own transaction and commit it.
fn write<T, F>(conn: &Connection, f: F) -> Result<T, DbError>
where
    F: FnOnce(&Connection) -> rusqlite::Result<T>,
{
    let tx = conn.unchecked_transaction()?;
    let out = f(&tx)?;
    tx.commit()?;
    Ok(out)
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get("id")?,
        username: row.get("username")?,
        password: row.get("password")?,
    })
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    // SQLite's CURRENT_TIMESTAMP is UTC without a zone suffix
    let raw: String = row.get("created")?;
    let created = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| {
            let idx = row.as_ref().column_index("created").unwrap_or_default();
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        })?;

    Ok(Post {
        id: row.get("id")?,
        title: row.get("title")?,
        body: row.get("body")?,
        created,
        author_id: row.get("author_id")?,
        username: row.get("username")?,
    })
}
