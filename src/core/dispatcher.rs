//! Single-call dispatch to the cloud execution service.
//!
//! [`CallDispatcher::dispatch`] always yields a [`CallResult`]: transport
//! errors, deadline expiry, cancellation and panics inside the executor are
//! all folded into `code == -1` results. No retry happens here.
use std::{panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::{
    core::{
        error::ErrorCode,
        model::{CallDescriptor, CallResult},
    },
    metrics,
    ports::{CloudExecutor, FaultReporter},
    utils::panic_message,
};

pub struct CallDispatcher {
    executor: Arc<dyn CloudExecutor>,
    deadline: Duration,
    reporter: Arc<dyn FaultReporter>,
}

impl CallDispatcher {
    pub fn new(
        executor: Arc<dyn CloudExecutor>,
        deadline: Duration,
        reporter: Arc<dyn FaultReporter>,
    ) -> Self {
        Self {
            executor,
            deadline,
            reporter,
        }
    }

    /// Run one call, bounded by the configured deadline and by `cancel`.
    pub async fn dispatch(&self, call: &CallDescriptor, cancel: &CancellationToken) -> CallResult {
        let _timer = metrics::DispatchTimer::new(&call.provider);
        let result = self.run(call, cancel).await;
        metrics::increment_dispatch_total(&call.provider, result.code);
        result
    }

    async fn run(&self, call: &CallDescriptor, cancel: &CancellationToken) -> CallResult {
        if let Some(field) = call.missing_field() {
            tracing::error!(field, "refusing to dispatch incomplete call descriptor");
            return CallResult::transport_failure(format!("call descriptor missing {field}"));
        }
        if !call.credential.is_usable() {
            tracing::warn!(
                provider = %call.provider,
                service = %call.service,
                "no usable credential, call not dispatched"
            );
            return CallResult::transport_failure("no usable credential for provider");
        }

        let span = tracing::info_span!(
            "dispatch",
            cloud.provider = %call.provider,
            cloud.service = %call.service,
            cloud.action = %call.action,
            cloud.region = %call.region,
            result.code = tracing::field::Empty,
        );

        let guarded = AssertUnwindSafe(self.executor.execute(call)).catch_unwind();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(parent: &span, "inbound request cancelled, abandoning call");
                return CallResult::transport_failure("call cancelled");
            }
            outcome = tokio::time::timeout(self.deadline, guarded).instrument(span.clone()) => {
                outcome
            }
        };

        let result = match outcome {
            Err(_) => {
                tracing::warn!(
                    parent: &span,
                    deadline_ms = u64::try_from(self.deadline.as_millis()).unwrap_or(u64::MAX),
                    "call exceeded its deadline"
                );
                CallResult::transport_failure(ErrorCode::Timeout.message())
            }
            Ok(Err(panic)) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(parent: &span, panic = %message, "executor panicked");
                self.reporter.capture_message("dispatcher.execute", &message);
                CallResult::transport_failure(ErrorCode::RpcFailure.message())
            }
            Ok(Ok(Err(e))) => {
                tracing::error!(parent: &span, error = %e, "cloud execution RPC failed");
                self.reporter.capture_error("dispatcher.execute", &e);
                CallResult::transport_failure(ErrorCode::RpcFailure.message())
            }
            Ok(Ok(Ok(result))) if result.is_success() && result.data.is_empty() => {
                tracing::error!(parent: &span, "backend reported success without a payload");
                CallResult::transport_failure("backend returned an empty payload")
            }
            Ok(Ok(Ok(result))) => result,
        };

        span.record("result.code", result.code);
        result
    }
}
