use async_trait::async_trait;
use tracing::Instrument;

use crate::{
    adapters::grpc::{
        channel::RpcChannelFactory,
        proto::{TokenCall, TokenServiceClient},
    },
    core::model::CloudCredential,
    ports::{RpcError, RpcResult, TokenRegistration, TokenStore},
};

/// Token store backed by the `TokenService` RPC.
pub struct GrpcTokenStore {
    channels: RpcChannelFactory,
}

impl GrpcTokenStore {
    pub fn new(channels: RpcChannelFactory) -> Self {
        Self { channels }
    }

    async fn client(&self) -> RpcResult<TokenServiceClient<tonic::transport::Channel>> {
        Ok(TokenServiceClient::new(self.channels.acquire().await?))
    }
}

#[async_trait]
impl TokenStore for GrpcTokenStore {
    async fn set(&self, registration: &TokenRegistration) -> RpcResult<String> {
        let mut client = self.client().await?;
        let request = TokenCall {
            cloud: registration.provider.clone(),
            name: registration.name.clone(),
            id: registration.credential.account_id.clone(),
            key: registration.credential.account_key.clone(),
            aaa_token_id: registration.caller_id.clone(),
        };

        let span = tracing::debug_span!("rpc", rpc.service = "TokenService", rpc.method = "Set");
        let back = client.set(request).instrument(span).await?.into_inner();
        Ok(back.id)
    }

    async fn get(
        &self,
        caller_id: &str,
        provider: &str,
        name: &str,
    ) -> RpcResult<CloudCredential> {
        let mut client = self.client().await?;
        let request = TokenCall {
            cloud: provider.to_string(),
            name: name.to_string(),
            aaa_token_id: caller_id.to_string(),
            ..TokenCall::default()
        };

        let span = tracing::debug_span!("rpc", rpc.service = "TokenService", rpc.method = "Get");
        match client.get(request).instrument(span).await {
            Ok(response) => Ok(response.into_inner().into()),
            Err(status) if status.code() == tonic::Code::NotFound => Ok(CloudCredential::empty()),
            Err(status) => Err(RpcError::from(status)),
        }
    }
}
