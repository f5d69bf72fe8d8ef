//! The scribe blog: request context, session handling, access guards,
//! handlers and the axum route table that ties them together.

pub mod app;
pub mod auth;
pub mod blog;
pub mod context;
pub mod error;
pub mod guard;
pub mod identity;
pub mod outcome;
pub mod session;
pub mod views;

pub use app::{AppState, AppStateInner, router};
pub use error::AppError;
