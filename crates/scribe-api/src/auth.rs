use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::{info, warn};

use scribe_db::{DbError, queries};

use crate::context::RequestContext;
use crate::error::AppError;
use crate::guard::Guarded;
use crate::outcome::{Endpoint, Outcome, Page};

pub fn register_endpoint() -> Guarded<()> {
    Guarded::new("auth.register", register)
}

pub fn login_endpoint() -> Guarded<()> {
    Guarded::new("auth.login", login)
}

pub fn logout_endpoint() -> Guarded<()> {
    Guarded::new("auth.logout", logout)
}

/// GET shows the form; POST creates the account.
pub fn register(ctx: &mut RequestContext, (): ()) -> Result<Outcome, AppError> {
    if !ctx.is_post() {
        return Ok(Outcome::Render(Page::Register));
    }

    let username = ctx.field("username").to_string();
    let password = ctx.field("password").to_string();

    let error = if username.is_empty() {
        "Username is required.".to_string()
    } else if password.is_empty() {
        "Password is required".to_string()
    } else {
        let password_hash = hash_password(&password)?;
        let created = queries::create_user(ctx.db()?, &username, &password_hash);
        match created {
            Ok(id) => {
                info!("Registered user {} ({})", username, id);
                return Ok(Outcome::Redirect(Endpoint::Login));
            }
            Err(DbError::UsernameTaken(_)) => format!("User {username} is already registered."),
            Err(e) => return Err(e.into()),
        }
    };

    ctx.flash(error);
    Ok(Outcome::Render(Page::Register))
}

/// GET shows the form; POST checks the credentials and starts a session.
pub fn login(ctx: &mut RequestContext, (): ()) -> Result<Outcome, AppError> {
    if !ctx.is_post() {
        return Ok(Outcome::Render(Page::Login));
    }

    let username = ctx.field("username").to_string();
    let password = ctx.field("password").to_string();

    let user = queries::get_user_by_username(ctx.db()?, &username)?;
    let error = match user {
        None => "Incorrect username.",
        Some(user) if !verify_password(&password, &user.password)? => "Incorrect password.",
        Some(user) => {
            let session = ctx.session_mut();
            session.clear();
            session.set_user_id(user.id);
            info!("User {} logged in", user.username);
            return Ok(Outcome::Redirect(Endpoint::Index));
        }
    };

    warn!("Failed login for {:?}: {}", username, error);
    ctx.flash(error);
    Ok(Outcome::Render(Page::Login))
}

pub fn logout(ctx: &mut RequestContext, (): ()) -> Result<Outcome, AppError> {
    ctx.session_mut().clear();
    Ok(Outcome::Redirect(Endpoint::Index))
}

/// Argon2id with a fresh random salt, encoded as a PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, stored: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
