use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::warn;

use scribe_types::session::SessionClaims;

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "session";

/// Client-held session state for one request.
///
/// Holds at most one user id plus queued flash messages. `modified` tracks
/// whether the cookie has to be rewritten when the response goes out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<i64>,
    flashes: Vec<String>,
    modified: bool,
}

impl Session {
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn set_user_id(&mut self, id: i64) {
        self.user_id = Some(id);
        self.modified = true;
    }

    /// Drop everything, including queued flashes.
    pub fn clear(&mut self) {
        self.user_id = None;
        self.flashes.clear();
        self.modified = true;
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.flashes.is_empty()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn take_flashes(&mut self) -> Vec<String> {
        if !self.flashes.is_empty() {
            self.modified = true;
        }
        std::mem::take(&mut self.flashes)
    }

    pub(crate) fn keep_flashes(&mut self, flashes: Vec<String>) {
        if !flashes.is_empty() {
            self.flashes.extend(flashes);
            self.modified = true;
        }
    }
}

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    /// Decode a session cookie value. Anything that fails signature or
    /// expiry checks becomes an empty session marked for clearing.
    pub fn load(&self, token: Option<&str>) -> Session {
        let Some(token) = token else {
            return Session::default();
        };

        match decode::<SessionClaims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => Session {
                user_id: data.claims.user_id,
                flashes: data.claims.flashes,
                modified: false,
            },
            Err(e) => {
                warn!("Discarding invalid session token: {}", e);
                Session {
                    modified: true,
                    ..Session::default()
                }
            }
        }
    }

    pub fn seal(&self, session: &Session) -> Result<String, AppError> {
        let expires = Utc::now()
            .checked_add_signed(self.lifetime)
            .ok_or(AppError::SessionLifetime)?;
        let claims = SessionClaims {
            user_id: session.user_id,
            flashes: session.flashes.clone(),
            exp: expires.timestamp() as usize,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }
}
