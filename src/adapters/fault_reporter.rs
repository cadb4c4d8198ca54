use crate::ports::FaultReporter;

/// Fault reporter that records faults as `tracing` events on the
/// `cloudgate::fault` target, where an error-tracking layer can pick them up.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFaultReporter;

impl FaultReporter for TracingFaultReporter {
    fn capture_error(&self, context: &str, error: &(dyn std::error::Error + 'static)) {
        let mut chain = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push_str(": ");
            chain.push_str(&cause.to_string());
            source = cause.source();
        }
        tracing::error!(target: "cloudgate::fault", context, error = %chain, "fault captured");
    }

    fn capture_message(&self, context: &str, message: &str) {
        tracing::error!(target: "cloudgate::fault", context, message, "fault captured");
    }
}
