//! Application state for the HR payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::auth::{Authenticator, ConfiguredAuthenticator, Credentials, SessionStore};
use crate::config::AppConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::service::PayrollService;
use crate::store::open_store;

/// Shared application state.
///
/// Holds the payroll service, the credential check and the live login
/// sessions.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PayrollService>,
    authenticator: Arc<dyn Authenticator>,
    sessions: Arc<SessionStore>,
}

impl AppState {
    /// Creates a new application state from its parts.
    pub fn new(
        service: PayrollService,
        authenticator: impl Authenticator + 'static,
        sessions: SessionStore,
    ) -> Self {
        Self {
            service: Arc::new(service),
            authenticator: Arc::new(authenticator),
            sessions: Arc::new(sessions),
        }
    }

    /// Opens the configured store and builds the state around it.
    pub fn from_config(config: AppConfig) -> PayrollResult<Self> {
        let store = open_store(&config.server.store)?;
        Ok(Self::new(
            PayrollService::new(store, config.policy),
            ConfiguredAuthenticator::new(&config.auth),
            SessionStore::new(config.server.session_ttl_minutes),
        ))
    }

    /// Runs a service operation on the blocking thread pool.
    ///
    /// Service calls hold the store lock and may rewrite the data file, so
    /// they stay off the async workers.
    pub async fn with_service<T, F>(&self, operation: F) -> PayrollResult<T>
    where
        F: FnOnce(&PayrollService) -> PayrollResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || operation(service.as_ref()))
            .await
            .map_err(|e| PayrollError::storage(format!("service task failed: {}", e)))?
    }

    /// Verifies credentials on the blocking thread pool, returning the
    /// canonical username.
    pub async fn authenticate(&self, credentials: Credentials) -> PayrollResult<String> {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || authenticator.authenticate(&credentials))
            .await
            .map_err(|e| PayrollError::storage(format!("password check task failed: {}", e)))?
    }

    /// Returns the session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
