//! Gateway metrics.
//!
//! Thin helpers over the `metrics` facade macros. No exporter is bundled:
//! values are recorded into whatever recorder the embedding application
//! installs, and dropped when none is.
//!
//! Provided metrics:
//! * `cloudgate_requests_total` (counter, labels `entry_point`, `code`)
//! * `cloudgate_request_duration_seconds` (histogram, label `entry_point`)
//! * `cloudgate_dispatch_total` (counter, labels `provider`, `code`)
//! * `cloudgate_dispatch_duration_seconds` (histogram, label `provider`)
//!
//! `code` is the envelope code for requests and the [`CallResult`] code for
//! dispatches.
//!
//! [`CallResult`]: crate::core::CallResult
use std::{
    sync::Once,
    time::{Duration, Instant},
};

use metrics::{Unit, counter, describe_counter, describe_histogram, histogram};

pub const CLOUDGATE_REQUESTS_TOTAL: &str = "cloudgate_requests_total";
pub const CLOUDGATE_REQUEST_DURATION_SECONDS: &str = "cloudgate_request_duration_seconds";
pub const CLOUDGATE_DISPATCH_TOTAL: &str = "cloudgate_dispatch_total";
pub const CLOUDGATE_DISPATCH_DURATION_SECONDS: &str = "cloudgate_dispatch_duration_seconds";

static DESCRIBED: Once = Once::new();

fn describe_metrics() {
    describe_counter!(
        CLOUDGATE_REQUESTS_TOTAL,
        Unit::Count,
        "Total number of requests answered, by entry point and envelope code."
    );
    describe_histogram!(
        CLOUDGATE_REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Latency of requests answered by the gateway."
    );
    describe_counter!(
        CLOUDGATE_DISPATCH_TOTAL,
        Unit::Count,
        "Total number of calls dispatched to the cloud execution service."
    );
    describe_histogram!(
        CLOUDGATE_DISPATCH_DURATION_SECONDS,
        Unit::Seconds,
        "Latency of calls dispatched to the cloud execution service."
    );
}

/// Count one answered request.
pub fn increment_request_total(entry_point: &'static str, code: i64) {
    counter!(
        CLOUDGATE_REQUESTS_TOTAL,
        "entry_point" => entry_point,
        "code" => code.to_string()
    )
    .increment(1);
}

/// Record how long a request took to answer.
pub fn record_request_duration(entry_point: &'static str, duration: Duration) {
    histogram!(CLOUDGATE_REQUEST_DURATION_SECONDS, "entry_point" => entry_point)
        .record(duration.as_secs_f64());
}

/// Count one finished dispatch.
pub fn increment_dispatch_total(provider: &str, code: i64) {
    counter!(
        CLOUDGATE_DISPATCH_TOTAL,
        "provider" => provider.to_string(),
        "code" => code.to_string()
    )
    .increment(1);
}

pub fn record_dispatch_duration(provider: &str, duration: Duration) {
    histogram!(CLOUDGATE_DISPATCH_DURATION_SECONDS, "provider" => provider.to_string())
        .record(duration.as_secs_f64());
}

/// Records the dispatch duration when dropped, including when the dispatch
/// future itself is dropped mid-flight.
pub struct DispatchTimer {
    start: Instant,
    provider: String,
}

impl DispatchTimer {
    pub fn new(provider: &str) -> Self {
        Self {
            start: Instant::now(),
            provider: provider.to_string(),
        }
    }
}

impl Drop for DispatchTimer {
    fn drop(&mut self) {
        record_dispatch_duration(&self.provider, self.start.elapsed());
    }
}

/// Register metric descriptions (idempotent).
pub fn init_metrics() -> eyre::Result<()> {
    tracing::info!("Initializing cloudgate metrics");
    DESCRIBED.call_once(describe_metrics);
    Ok(())
}
