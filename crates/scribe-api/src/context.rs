use std::collections::HashMap;

use axum::http::Method;
use rusqlite::Connection;
use tracing::warn;

use scribe_db::{Database, DbError, RequestConnection};
use scribe_types::models::User;

use crate::session::Session;

/// Everything a handler may touch during one request.
///
/// Passed by `&mut` through identity loading, guards and the handler, then
/// torn down by the dispatcher. Nothing here outlives the request.
pub struct RequestContext {
    method: Method,
    form: HashMap<String, String>,
    session: Session,
    db: RequestConnection,
    user: Option<User>,
    flashes: Vec<String>,
}

impl RequestContext {
    pub fn new(db: Database, method: Method, form: HashMap<String, String>, mut session: Session) -> Self {
        let flashes = session.take_flashes();
        Self {
            method,
            form,
            session,
            db: RequestConnection::new(db),
            user: None,
            flashes,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    /// A submitted form field. Missing fields read as empty.
    pub fn field(&self, name: &str) -> &str {
        self.form.get(name).map(String::as_str).unwrap_or_default()
    }

    /// The request's connection, opened on first use.
    pub fn db(&mut self) -> Result<&Connection, DbError> {
        self.db.get()
    }

    pub fn has_connection(&self) -> bool {
        self.db.is_open()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The logged-in user, as loaded once at the start of the request.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub(crate) fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Queue a one-shot message for the next rendered page.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flashes.push(message.into());
    }

    pub fn flashes(&self) -> &[String] {
        &self.flashes
    }

    pub fn take_flashes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flashes)
    }

    /// Close the request connection. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let Err(e) = self.db.close() {
            warn!("Failed to close request connection: {}", e);
        }
    }

    /// Finish the request, handing back the session to be written out.
    /// Flashes nobody rendered are carried into the session.
    pub fn into_session(mut self) -> Session {
        self.teardown();
        let flashes = std::mem::take(&mut self.flashes);
        self.session.keep_flashes(flashes);
        std::mem::take(&mut self.session)
    }
}
