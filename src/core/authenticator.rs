//! Caller authentication.
//!
//! Two independent variants share one boolean contract and are selected by
//! entry point, never by inspecting the request at runtime:
//! * [`PrivateTokenAuthenticator`] asks the AAA collaborator about a signed
//!   `(id, signature)` pair and fails closed when that call errors.
//! * [`OpenTokenAuthenticator`] compares an opaque token against the single
//!   process-wide open token used by raw-mode integrations.
use std::sync::Arc;

use async_trait::async_trait;
use subtle::ConstantTimeEq;

use crate::{
    core::model::AuthenticationToken,
    ports::{AaaError, AaaVerifier, FaultReporter},
};

#[async_trait]
pub trait Authenticator: Send + Sync {
    type Credentials: ?Sized + Sync;

    /// `true` only when the caller is positively authenticated.
    async fn authenticate(&self, credentials: &Self::Credentials) -> bool;
}

pub struct PrivateTokenAuthenticator {
    verifier: Arc<dyn AaaVerifier>,
    reporter: Arc<dyn FaultReporter>,
}

impl PrivateTokenAuthenticator {
    pub fn new(verifier: Arc<dyn AaaVerifier>, reporter: Arc<dyn FaultReporter>) -> Self {
        Self { verifier, reporter }
    }
}

#[async_trait]
impl Authenticator for PrivateTokenAuthenticator {
    type Credentials = AuthenticationToken;

    async fn authenticate(&self, token: &AuthenticationToken) -> bool {
        if token.id.is_empty() || token.signature.is_empty() {
            return false;
        }

        match self.verifier.verify(&token.id, &token.signature).await {
            Ok(valid) => {
                if !valid {
                    tracing::info!(caller = %token.id, "AAA verification rejected caller");
                }
                valid
            }
            Err(AaaError::Rejected(reason)) => {
                tracing::info!(caller = %token.id, %reason, "AAA service rejected caller");
                false
            }
            Err(e) => {
                tracing::warn!(caller = %token.id, error = %e, "AAA verification failed");
                self.reporter.capture_error("authenticator.private_token", &e);
                false
            }
        }
    }
}

pub struct OpenTokenAuthenticator {
    open_token: String,
}

impl OpenTokenAuthenticator {
    pub fn new(open_token: impl Into<String>) -> Self {
        Self {
            open_token: open_token.into(),
        }
    }
}

#[async_trait]
impl Authenticator for OpenTokenAuthenticator {
    type Credentials = str;

    async fn authenticate(&self, token: &str) -> bool {
        // An unset open token disables raw mode entirely.
        if self.open_token.is_empty() {
            return false;
        }
        bool::from(self.open_token.as_bytes().ct_eq(token.as_bytes()))
    }
}
