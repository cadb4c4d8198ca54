use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

use crate::ports::{RpcError, RpcResult};

fn duration_to_u64_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Builds one channel per call to a collaborator.
///
/// Channels are never pooled: each call acquires its own and drops it when
/// the call returns, on every path.
#[derive(Debug, Clone)]
pub struct RpcChannelFactory {
    endpoint: Endpoint,
    target: String,
}

impl RpcChannelFactory {
    pub fn new(
        uri: impl Into<String>,
        connect_timeout: Duration,
        call_timeout: Duration,
    ) -> RpcResult<Self> {
        let target = uri.into();
        let endpoint = Endpoint::from_shared(target.clone())
            .map_err(|e| RpcError::Connection(format!("invalid endpoint {target}: {e}")))?
            .connect_timeout(connect_timeout)
            .timeout(call_timeout);

        tracing::debug!(
            target = %target,
            connect_timeout_ms = duration_to_u64_ms(connect_timeout),
            call_timeout_ms = duration_to_u64_ms(call_timeout),
            "RPC endpoint configured"
        );
        Ok(Self { endpoint, target })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub async fn acquire(&self) -> RpcResult<Channel> {
        self.endpoint.connect().await.map_err(|e| {
            tracing::warn!(target = %self.target, error = %e, "RPC connect failed");
            RpcError::Connection(format!("{}: {e}", self.target))
        })
    }
}
