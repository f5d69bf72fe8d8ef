use serde::{Deserialize, Serialize};

/// Claims carried by the signed session cookie.
///
/// The session holds at most one user id. Flash messages that were queued
/// but not yet shown ride along until the next rendered page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<String>,
    pub exp: usize,
}
