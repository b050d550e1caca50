//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::DocumentStore;
use crate::services::{OtpNotifier, RegistrationService, SessionIssuer};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the document
/// store, the OTP notifier, and the session token issuer.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn OtpNotifier>,
    issuer: SessionIssuer,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn OtpNotifier>,
    ) -> Self {
        let issuer = SessionIssuer::new(&config.auth);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                notifier,
                issuer,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the OTP notifier.
    #[must_use]
    pub fn notifier(&self) -> &dyn OtpNotifier {
        self.inner.notifier.as_ref()
    }

    /// Get a reference to the session token issuer.
    #[must_use]
    pub fn issuer(&self) -> &SessionIssuer {
        &self.inner.issuer
    }

    /// Build a registration service borrowing this state.
    #[must_use]
    pub fn registration_service(&self) -> RegistrationService<'_> {
        RegistrationService::new(
            self.store(),
            self.notifier(),
            self.issuer(),
            self.config().auth.otp_ttl,
        )
    }
}
