use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The logged-in identity. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// A blog post joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created: DateTime<Utc>,
    pub author_id: i64,
    pub username: String,
}
