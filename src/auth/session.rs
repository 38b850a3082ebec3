//! Bearer-token sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};

/// An authenticated login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The bearer token identifying the session.
    pub token: Uuid,
    /// The user who logged in.
    pub username: String,
    /// When the session stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Issues, validates and revokes sessions.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    /// Creates a store whose sessions last `ttl_minutes`.
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes.max(1)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Starts a session for an authenticated user.
    pub fn issue(&self, username: &str) -> PayrollResult<Session> {
        let session = Session {
            token: Uuid::new_v4(),
            username: username.to_string(),
            expires_at: Utc::now() + self.ttl,
        };

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| PayrollError::storage("session table lock poisoned"))?;
        let now = Utc::now();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(session.token, session.clone());
        Ok(session)
    }

    /// Returns the live session for a token.
    pub fn validate(&self, token: Uuid) -> PayrollResult<Session> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| PayrollError::storage("session table lock poisoned"))?;

        match sessions.get(&token) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.clone()),
            Some(_) => Err(PayrollError::Unauthorized {
                message: "session expired".to_string(),
            }),
            None => Err(PayrollError::Unauthorized {
                message: "unknown session".to_string(),
            }),
        }
    }

    /// Ends a session; returns false if it did not exist.
    pub fn revoke(&self, token: Uuid) -> PayrollResult<bool> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| PayrollError::storage("session table lock poisoned"))?;
        Ok(sessions.remove(&token).is_some())
    }
}
