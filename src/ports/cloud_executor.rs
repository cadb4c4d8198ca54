use async_trait::async_trait;

use crate::{
    core::model::{CallDescriptor, CallResult},
    ports::rpc::RpcResult,
};

/// CloudExecutor defines the port to the backend cloud execution service
#[async_trait]
pub trait CloudExecutor: Send + Sync + 'static {
    /// Execute one provider call.
    ///
    /// Implementations acquire a channel for the duration of this call only
    /// and must release it on every exit path.
    async fn execute(&self, call: &CallDescriptor) -> RpcResult<CallResult>;
}
