//! Local username/password authentication.
//!
//! Holds a single active session, matching the one-user-at-a-time model of
//! a shared household device.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use uuid::Uuid;

use hearth_core::types::UserIdentity;

/// Authentication failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("username already taken")]
    UserExists,
}

impl From<AuthError> for hearth_core::error::HearthError {
    fn from(err: AuthError) -> Self {
        hearth_core::error::HearthError::Auth(err.to_string())
    }
}

/// Authentication surface the dispatcher talks to.
pub trait AuthService: Send + Sync {
    /// Authenticate and open a session.
    fn login(&self, username: &str, password: &str) -> Result<UserIdentity, AuthError>;
    /// Create an account and open a session for it.
    fn register(&self, username: &str, password: &str) -> Result<UserIdentity, AuthError>;
    /// Close the active session, returning who was signed in.
    fn logout(&self) -> Option<UserIdentity>;
    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<UserIdentity>;
}

struct Account {
    id: Uuid,
    password: String,
}

/// In-memory [`AuthService`] implementation.
///
/// Credentials live in process memory only; this backs the standalone demo
/// and tests, not a multi-device deployment.
#[derive(Default)]
pub struct LocalAuth {
    accounts: Mutex<HashMap<String, Account>>,
    session: Mutex<Option<UserIdentity>>,
}

impl LocalAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthService for LocalAuth {
    fn login(&self, username: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let accounts = self.accounts.lock().expect("auth mutex poisoned");
        let account = accounts
            .get(username)
            .filter(|account| account.password == password)
            .ok_or(AuthError::InvalidCredentials)?;
        let identity = UserIdentity {
            id: account.id,
            username: username.to_string(),
        };
        drop(accounts);

        *self.session.lock().expect("auth mutex poisoned") = Some(identity.clone());
        tracing::info!("User {} logged in", identity.username);
        Ok(identity)
    }

    fn register(&self, username: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let mut accounts = self.accounts.lock().expect("auth mutex poisoned");
        if accounts.contains_key(username) {
            return Err(AuthError::UserExists);
        }
        let id = Uuid::new_v4();
        accounts.insert(
            username.to_string(),
            Account {
                id,
                password: password.to_string(),
            },
        );
        drop(accounts);

        let identity = UserIdentity {
            id,
            username: username.to_string(),
        };
        *self.session.lock().expect("auth mutex poisoned") = Some(identity.clone());
        tracing::info!("Registered user {}", username);
        Ok(identity)
    }

    fn logout(&self) -> Option<UserIdentity> {
        let previous = self.session.lock().expect("auth mutex poisoned").take();
        if let Some(user) = &previous {
            tracing::info!("User {} logged out", user.username);
        }
        previous
    }

    fn current_user(&self) -> Option<UserIdentity> {
        self.session.lock().expect("auth mutex poisoned").clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
