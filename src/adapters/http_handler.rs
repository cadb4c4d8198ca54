//! axum surface of the gateway.
//!
//! Each entry point drains and validates the body, hands the decoded request
//! to [`CloudGateway`] and renders the outcome. Handlers never propagate a
//! panic: a fault anywhere below is reported and answered with the
//! `Unknown` envelope.
use std::{future::Future, panic::AssertUnwindSafe, sync::Arc, time::Instant};

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    core::{
        CloudGateway, ErrorCode, ErrorEnvelope, GatewayResult,
        request::{CloudApiRawRequest, CloudApiRequest, TokenRegistrationRequest},
        validator::{parse_payload, validate_post_data},
    },
    metrics,
    tracing_setup::create_request_span,
    utils::panic_message,
};

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<CloudGateway>,
    max_body_bytes: usize,
    version: Arc<str>,
}

impl AppState {
    pub fn new(gateway: Arc<CloudGateway>, max_body_bytes: usize, version: &str) -> Self {
        Self {
            gateway,
            max_body_bytes,
            version: Arc::from(version),
        }
    }
}

/// Build the gateway's route table.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/cloud/token", post(register_token))
        .route("/v1/cloud/{provider}/{service}", post(cloud_call))
        .route("/v1/raw/cloud/{provider}/{service}", post(raw_cloud_call))
        .route("/version", get(config_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn register_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let gateway = state.gateway.clone();
    let limit = state.max_body_bytes;
    handle(&state, "register_token", "/v1/cloud/token", async move {
        let payload = validate_post_data(&headers, body, limit).await?;
        let request: TokenRegistrationRequest = parse_payload(&payload)?;
        tracing::debug!(
            provider = %request.provider,
            name = %request.name,
            "registering credential"
        );
        gateway
            .register_token(request)
            .await
            .map(IntoResponse::into_response)
    })
    .await
}

async fn cloud_call(
    State(state): State<AppState>,
    Path((provider, service)): Path<(String, String)>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let gateway = state.gateway.clone();
    let limit = state.max_body_bytes;
    let path = format!("/v1/cloud/{provider}/{service}");
    handle(&state, "cloud_call", &path, async move {
        let payload = validate_post_data(&headers, body, limit).await?;
        let request: CloudApiRequest = parse_payload(&payload)?;

        // Dropping the handler future (client gone) cancels the in-flight call.
        let cancel = CancellationToken::new();
        let _cancel_on_drop = cancel.clone().drop_guard();
        gateway
            .call(&provider, &service, request, &cancel)
            .await
            .map(IntoResponse::into_response)
    })
    .await
}

async fn raw_cloud_call(
    State(state): State<AppState>,
    Path((provider, service)): Path<(String, String)>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let gateway = state.gateway.clone();
    let limit = state.max_body_bytes;
    let path = format!("/v1/raw/cloud/{provider}/{service}");
    handle(&state, "raw_cloud_call", &path, async move {
        let payload = validate_post_data(&headers, body, limit).await?;
        let request: CloudApiRawRequest = parse_payload(&payload)?;

        let cancel = CancellationToken::new();
        let _cancel_on_drop = cancel.clone().drop_guard();
        gateway
            .call_raw(&provider, &service, request, &cancel)
            .await
            .map(IntoResponse::into_response)
    })
    .await
}

async fn config_version(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("[Success] config version  === {}", state.version),
    )
        .into_response()
}

/// Run one entry point inside its request span, converting errors and
/// panics into envelopes.
async fn handle<F>(
    state: &AppState,
    entry_point: &'static str,
    path: &str,
    work: F,
) -> Response
where
    F: Future<Output = GatewayResult<Response>>,
{
    let request_id = Uuid::new_v4().to_string();
    let span = create_request_span(entry_point, path, &request_id);
    let started = Instant::now();

    let (response, code) = async {
        let (response, code) = match AssertUnwindSafe(work).catch_unwind().await {
            Ok(Ok(response)) => (response, 0),
            Ok(Err(e)) => {
                tracing::info!(error = %e, "request rejected");
                let code = e.error_code().code();
                (e.into_response(), code)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(panic = %message, "handler panicked");
                state.gateway.reporter().capture_message(entry_point, &message);
                (
                    ErrorEnvelope::from_error_code(ErrorCode::Unknown).into_response(),
                    ErrorCode::Unknown.code(),
                )
            }
        };
        tracing::Span::current().record("gateway.code", code);
        (response, code)
    }
    .instrument(span.clone())
    .await;

    let elapsed = started.elapsed();
    span.record(
        "duration_ms",
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    );
    metrics::increment_request_total(entry_point, code);
    metrics::record_request_duration(entry_point, elapsed);
    response
}
