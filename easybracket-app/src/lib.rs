//! # easybracket-app
//!
//! The application layer of EasyBracket. The [`Controller`] owns the [`AppState`] and drives
//! every user facing operation through two injected collaborators: a [`Store`] for persistence
//! and change notifications, and an [`Auth`] implementation for sessions.
//!
//! [`Controller`]: controller::Controller
//! [`AppState`]: controller::AppState
//! [`Store`]: store::Store
//! [`Auth`]: auth::Auth
pub mod auth;
pub mod config;
pub mod controller;
pub mod id;
pub mod logger;
pub mod report;
pub mod store;

pub use config::Config;

use thiserror::Error;

use auth::AuthError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Bracket(#[from] easybracket_core::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("not found")]
    NotFound,
    #[error("sign in required")]
    Unauthorized,
    #[error("no tournament selected")]
    NoTournament,
    #[error("teams cannot be changed after the bracket was generated")]
    Locked,
    #[error("a team needs 1 or 2 players")]
    InvalidPlayers,
}
