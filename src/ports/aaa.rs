use async_trait::async_trait;
use thiserror::Error;

use crate::ports::rpc::RpcError;

/// Error type for the AAA verification collaborator
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AaaError {
    #[error("AAA service unreachable: {0}")]
    Rpc(#[from] RpcError),

    #[error("AAA service rejected the request: {0}")]
    Rejected(String),
}

/// AaaVerifier defines the port for checking a caller's signed token.
///
/// The gateway treats the answer as a plain predicate; any `Err` is handled
/// as a failed verification by the caller.
#[async_trait]
pub trait AaaVerifier: Send + Sync + 'static {
    /// Verify that `signature` is valid for caller `id`.
    async fn verify(&self, id: &str, signature: &str) -> Result<bool, AaaError>;
}
