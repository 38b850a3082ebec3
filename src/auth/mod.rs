//! Credential verification and login sessions.
//!
//! The [`Authenticator`] trait verifies credentials server-side;
//! [`ConfiguredAuthenticator`] checks them against the Argon2 hashes in
//! `auth.yaml`. A successful login is turned into a bearer-token
//! [`Session`] by the [`SessionStore`].

mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::{Session, SessionStore};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{AuthConfig, UserCredential};
use crate::error::{PayrollError, PayrollResult};

/// A login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

/// Verifies credentials.
pub trait Authenticator: Send + Sync {
    /// Returns the verified username, or
    /// [`PayrollError::AuthenticationFailed`].
    fn authenticate(&self, credentials: &Credentials) -> PayrollResult<String>;
}

/// Authenticates against the users listed in configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredAuthenticator {
    users: Vec<UserCredential>,
}

impl ConfiguredAuthenticator {
    /// Creates an authenticator for the configured users.
    pub fn new(config: &AuthConfig) -> Self {
        if config.users.is_empty() {
            warn!("No users configured; every login will be rejected");
        }
        Self {
            users: config.users.clone(),
        }
    }
}

impl Authenticator for ConfiguredAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> PayrollResult<String> {
        let user = self
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(credentials.username.trim()))
            .ok_or(PayrollError::AuthenticationFailed)?;

        if verify_password(&credentials.password, &user.password_hash)? {
            Ok(user.username.clone())
        } else {
            Err(PayrollError::AuthenticationFailed)
        }
    }
}
