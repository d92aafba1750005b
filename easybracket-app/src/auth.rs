//! Session management.
//!
//! [`DemoAuth`] is an in-memory stand-in for a real identity provider. It is meant for local
//! use and tests only: accounts are lost when the process exits.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::id::UserId;

const CHANNEL_CAPACITY: usize = 16;

pub trait Auth {
    /// Creates a new account. This does not sign the user in.
    fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Signs in with the given credentials, replacing the current session.
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    fn sign_out(&self) -> Result<(), AuthError>;

    /// Returns the current session.
    fn session(&self) -> Option<Session>;

    /// Subscribes to session changes. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserExists,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email and password must not be empty")]
    MissingCredentials,
}

/// An in-memory [`Auth`] implementation for demos and tests.
#[derive(Debug)]
pub struct DemoAuth {
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<Session>>,
    tx: broadcast::Sender<SessionEvent>,
}

#[derive(Clone, Debug)]
struct Account {
    user: User,
    /// Hex encoded SHA-256 digest of the salted password.
    password: String,
}

impl DemoAuth {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self {
            accounts: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            tx,
        }
    }
}

impl Default for DemoAuth {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Auth for DemoAuth {
    fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let mut accounts = self.accounts.write();
        if accounts.contains_key(email) {
            return Err(AuthError::UserExists);
        }

        let user = User {
            id: UserId::generate(),
            email: email.to_owned(),
        };

        let password = password_hash(password, user.id.0.to_le_bytes());

        accounts.insert(
            email.to_owned(),
            Account {
                user: user.clone(),
                password,
            },
        );

        log::debug!("Created demo account {}", user.id);

        Ok(user)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let user = {
            let accounts = self.accounts.read();

            let account = accounts.get(email).ok_or(AuthError::InvalidCredentials)?;
            if account.password != password_hash(password, account.user.id.0.to_le_bytes()) {
                return Err(AuthError::InvalidCredentials);
            }

            account.user.clone()
        };

        let session = Session {
            user,
            created_at: Utc::now(),
        };

        *self.session.write() = Some(session.clone());
        let _ = self.tx.send(SessionEvent::SignedIn(session.clone()));

        log::debug!("User {} signed in", session.user.id);

        Ok(session)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.write() = None;
        let _ = self.tx.send(SessionEvent::SignedOut);

        Ok(())
    }

    fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

/// Hashes the `password` together with the `salt`, returning the hex encoded digest.
pub fn password_hash<S>(password: &str, salt: S) -> String
where
    S: AsRef<[u8]>,
{
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_ref());
    hex::encode(hasher.finalize())
}
