//! Per-caller credential lookup and registration against the token store.
use std::sync::Arc;

use tracing::Instrument;

use crate::{
    core::model::CloudCredential,
    ports::{FaultReporter, TokenRegistration, TokenStore},
};

/// Resolves stored provider credentials with a fail-empty contract: every
/// failure surfaces as an empty value, never as an error.
pub struct CredentialResolver {
    store: Arc<dyn TokenStore>,
    reporter: Arc<dyn FaultReporter>,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn TokenStore>, reporter: Arc<dyn FaultReporter>) -> Self {
        Self { store, reporter }
    }

    /// Look up the credential stored under `(caller_id, provider, name)`.
    ///
    /// Returns an empty pair on transport error or when nothing is stored.
    pub async fn resolve(&self, caller_id: &str, provider: &str, name: &str) -> CloudCredential {
        let span = tracing::debug_span!("credential_resolve", caller = %caller_id, provider, name);
        match self.store.get(caller_id, provider, name).instrument(span).await {
            Ok(credential) if credential.is_usable() => credential,
            Ok(_) => {
                tracing::info!(caller = %caller_id, provider, name, "no stored credential");
                CloudCredential::empty()
            }
            Err(e) => {
                tracing::error!(
                    caller = %caller_id,
                    provider,
                    error = %e,
                    "credential lookup failed"
                );
                self.reporter.capture_error("credentials.resolve", &e);
                CloudCredential::empty()
            }
        }
    }

    /// Store a credential. `None` means the registration did not succeed.
    pub async fn register(&self, registration: &TokenRegistration) -> Option<String> {
        match self.store.set(registration).await {
            Ok(assigned) if !assigned.is_empty() => {
                tracing::info!(
                    caller = %registration.caller_id,
                    provider = %registration.provider,
                    name = %registration.name,
                    "credential registered"
                );
                Some(assigned)
            }
            Ok(_) => {
                tracing::warn!(
                    caller = %registration.caller_id,
                    provider = %registration.provider,
                    "token store did not assign an id"
                );
                None
            }
            Err(e) => {
                tracing::error!(
                    caller = %registration.caller_id,
                    error = %e,
                    "credential registration failed"
                );
                self.reporter.capture_error("credentials.register", &e);
                None
            }
        }
    }
}
