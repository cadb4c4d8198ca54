use async_trait::async_trait;
use tracing::Instrument;

use crate::{
    adapters::grpc::{
        channel::RpcChannelFactory,
        proto::{AaaServiceClient, AaaVerifyRequest},
    },
    ports::{AaaError, AaaVerifier, RpcError},
};

/// AAA verifier backed by the `AaaService` RPC.
pub struct GrpcAaaVerifier {
    channels: RpcChannelFactory,
}

impl GrpcAaaVerifier {
    pub fn new(channels: RpcChannelFactory) -> Self {
        Self { channels }
    }
}

#[async_trait]
impl AaaVerifier for GrpcAaaVerifier {
    async fn verify(&self, id: &str, signature: &str) -> Result<bool, AaaError> {
        let mut client = AaaServiceClient::new(self.channels.acquire().await?);
        let request = AaaVerifyRequest {
            id: id.to_string(),
            signature: signature.to_string(),
        };

        let span = tracing::debug_span!("rpc", rpc.service = "AaaService", rpc.method = "Verify");
        match client.verify(request).instrument(span).await {
            Ok(response) => Ok(response.into_inner().valid),
            Err(status)
                if matches!(
                    status.code(),
                    tonic::Code::Unauthenticated | tonic::Code::PermissionDenied
                ) =>
            {
                Err(AaaError::Rejected(status.message().to_string()))
            }
            Err(status) => Err(AaaError::Rpc(RpcError::from(status))),
        }
    }
}
