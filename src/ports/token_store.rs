use async_trait::async_trait;

use crate::{core::model::CloudCredential, ports::rpc::RpcResult};

/// A credential to be stored for one caller under a provider and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRegistration {
    pub provider: String,
    pub caller_id: String,
    pub name: String,
    pub credential: CloudCredential,
}

/// TokenStore defines the port to the credential storage service
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Store a credential and return the id assigned to it.
    ///
    /// An empty id means the store did not accept the registration.
    async fn set(&self, registration: &TokenRegistration) -> RpcResult<String>;

    /// Fetch the credential stored for `(caller_id, provider, name)`.
    ///
    /// A missing entry is returned as an empty credential, not as an error.
    async fn get(&self, caller_id: &str, provider: &str, name: &str)
    -> RpcResult<CloudCredential>;
}
