/// FaultReporter defines the port to the fire-and-forget error telemetry sink.
///
/// Implementations must not block and must never fail the caller.
pub trait FaultReporter: Send + Sync + 'static {
    /// Report an error observed at `context`.
    fn capture_error(&self, context: &str, error: &(dyn std::error::Error + 'static));

    /// Report a free-form fault message, e.g. a recovered panic payload.
    fn capture_message(&self, context: &str, message: &str);
}
