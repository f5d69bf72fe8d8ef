use scribe_types::models::User;

/// Database row type for `user`. Posts are read straight into
/// `scribe_types::models::Post`; only the user row carries a secret.
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
        }
    }
}
