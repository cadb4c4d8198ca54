use eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging at `level`, as JSON lines or human-readable output.
///
/// `RUST_LOG`, when set, overrides `level`.
pub fn init_tracing(level: &str, json_format: bool) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .wrap_err_with(|| format!("Invalid log level: {level}"))?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    if json_format {
        Registry::default()
            .with(env_filter)
            .with(
                fmt_layer
                    .json()
                    .with_current_span(false)
                    .with_span_list(true),
            )
            .try_init()
            .wrap_err("Failed to install tracing subscriber")?;
    } else {
        Registry::default()
            .with(env_filter)
            .with(fmt_layer.pretty().with_ansi(true))
            .try_init()
            .wrap_err("Failed to install tracing subscriber")?;
    }

    tracing::info!(level, json = json_format, "cloudgate logging initialized");
    Ok(())
}

/// Create a request-scoped tracing span
pub fn create_request_span(entry_point: &str, path: &str, request_id: &str) -> tracing::Span {
    tracing::info_span!(
        "request",
        gateway.entry_point = entry_point,
        http.path = path,
        request.id = request_id,
        gateway.code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}
