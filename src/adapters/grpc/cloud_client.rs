use async_trait::async_trait;
use tracing::Instrument;

use crate::{
    adapters::grpc::{
        channel::RpcChannelFactory,
        proto::{CloudApiCall, CloudExecutionServiceClient},
    },
    core::model::{CallDescriptor, CallResult},
    ports::{CloudExecutor, RpcResult},
};

/// Cloud executor backed by the `CloudExecutionService` RPC.
///
/// Provider payloads are carried as bytes on the wire and handed to the
/// transcoder as (lossily decoded) text.
pub struct GrpcCloudExecutor {
    channels: RpcChannelFactory,
}

impl GrpcCloudExecutor {
    pub fn new(channels: RpcChannelFactory) -> Self {
        Self { channels }
    }
}

#[async_trait]
impl CloudExecutor for GrpcCloudExecutor {
    async fn execute(&self, call: &CallDescriptor) -> RpcResult<CallResult> {
        let mut client = CloudExecutionServiceClient::new(self.channels.acquire().await?);
        let span = tracing::debug_span!(
            "rpc",
            rpc.service = "CloudExecutionService",
            rpc.method = "Execute"
        );
        let back = client
            .execute(CloudApiCall::from(call))
            .instrument(span)
            .await?
            .into_inner();
        tracing::debug!(code = back.code, bytes = back.data.len(), "cloud call answered");
        Ok(back.into())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tonic::Code;

    use super::*;
    use crate::{
        adapters::grpc::{
            proto::CloudApiBack,
            test_server::{Reply, ScriptedBackend, TestServer},
        },
        core::model::CloudCredential,
        ports::RpcError,
    };

    fn call() -> CallDescriptor {
        CallDescriptor::new(
            "aws",
            "ec2",
            "DescribeRegions",
            "us-east-1",
            CloudCredential::new("AKIA", "secret"),
        )
        .with_parameters([("MaxResults".to_string(), "5".to_string())].into())
    }

    async fn serve_cloud(execute: Reply<CloudApiBack>) -> TestServer {
        TestServer::start(ScriptedBackend {
            execute,
            ..ScriptedBackend::default()
        })
        .await
    }

    #[tokio::test]
    async fn test_descriptor_reaches_backend() {
        let server = serve_cloud(Ok(CloudApiBack {
            code: 0,
            msg: String::new(),
            data: b"<DescribeRegionsResponse/>".to_vec(),
        }))
        .await;

        let result = GrpcCloudExecutor::new(server.channels())
            .execute(&call())
            .await
            .unwrap();
        assert_eq!(result, CallResult::success("<DescribeRegionsResponse/>"));

        let sent = server.backend().cloud_requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].cloud, "aws");
        assert_eq!(sent[0].action, "DescribeRegions");
        assert_eq!(sent[0].cloud_id, "AKIA");
        assert_eq!(sent[0].params["MaxResults"], "5");
    }

    #[tokio::test]
    async fn test_backend_failure_code_and_message_are_kept() {
        let server = serve_cloud(Ok(CloudApiBack {
            code: 4003,
            msg: "AuthFailure.SignatureExpire".to_string(),
            data: b"{}".to_vec(),
        }))
        .await;

        let result = GrpcCloudExecutor::new(server.channels())
            .execute(&call())
            .await
            .unwrap();
        assert_eq!(result.code, 4003);
        assert_eq!(result.message, "AuthFailure.SignatureExpire");
        assert_eq!(result.data, "{}");
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_deadline_status_is_timeout() {
        let server = serve_cloud(Err((Code::DeadlineExceeded, "provider too slow"))).await;

        let err = GrpcCloudExecutor::new(server.channels())
            .execute(&call())
            .await
            .unwrap_err();
        assert_eq!(err, RpcError::Timeout("provider too slow".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_executor_is_connection_error() {
        let executor = GrpcCloudExecutor::new(
            RpcChannelFactory::new(
                "http://127.0.0.1:1",
                Duration::from_millis(300),
                Duration::from_millis(300),
            )
            .unwrap(),
        );

        assert!(matches!(
            executor.execute(&call()).await,
            Err(RpcError::Connection(_))
        ));
    }
}
