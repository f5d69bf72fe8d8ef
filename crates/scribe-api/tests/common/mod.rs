#![allow(dead_code)]

use std::collections::HashMap;

use axum::http::Method;
use tempfile::TempDir;

use scribe_api::auth;
use scribe_api::context::RequestContext;
use scribe_api::guard;
use scribe_api::outcome::Outcome;
use scribe_api::session::Session;
use scribe_db::Database;

/// A fresh database file with the schema applied.
pub fn database() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db = Database::open(dir.path().join("scribe.sqlite")).expect("failed to open database");
    db.init_schema().expect("failed to init schema");
    (dir, db)
}

pub fn context(db: &Database, method: Method, form: &[(&str, &str)], user_id: Option<i64>) -> RequestContext {
    let mut session = Session::default();
    if let Some(id) = user_id {
        session.set_user_id(id);
    }
    let form: HashMap<String, String> = form
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    RequestContext::new(db.clone(), method, form, session)
}

/// Register a user through the handler and return its id.
pub fn register(db: &Database, username: &str, password: &str) -> i64 {
    let mut ctx = context(
        db,
        Method::POST,
        &[("username", username), ("password", password)],
        None,
    );
    let outcome = guard::dispatch(&mut ctx, &auth::register_endpoint(), ()).expect("register failed");
    assert!(matches!(outcome, Outcome::Redirect(_)), "register did not redirect: {outcome:?}");
    user_id(db, username)
}

pub fn user_id(db: &Database, username: &str) -> i64 {
    let conn = db.connect().expect("connect");
    let id = conn
        .query_row("SELECT id FROM user WHERE username = ?1", [username], |row| row.get("id"))
        .expect("user not found");
    db.release(conn).expect("release");
    id
}

pub fn count(db: &Database, table: &str) -> i64 {
    let conn = db.connect().expect("connect");
    let n = conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .expect("count failed");
    db.release(conn).expect("release");
    n
}
