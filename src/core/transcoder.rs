//! Final HTTP body encoding for a dispatched call.
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::core::{
    error::{ErrorCode, ErrorEnvelope},
    model::CallResult,
    provider::{WireFormat, profile_for},
};

/// Which entry point produced the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    Private,
    Raw,
}

/// An encoded response body plus its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcoded {
    pub format: WireFormat,
    pub body: Bytes,
}

impl Transcoded {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

impl IntoResponse for Transcoded {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, self.format.content_type())],
            self.body,
        )
            .into_response()
    }
}

/// Encode `result` for the caller.
///
/// A success body is the provider payload verbatim; only raw-mode calls to
/// a provider whose native format is XML are tagged as XML. Any failure is
/// the JSON encoding of the whole result whatever the provider.
pub fn transcode(provider: &str, mode: CallMode, result: CallResult) -> Transcoded {
    if result.is_success() {
        let format = match mode {
            CallMode::Raw => profile_for(provider).raw_format,
            CallMode::Private => WireFormat::Json,
        };
        return Transcoded {
            format,
            body: Bytes::from(result.data),
        };
    }

    let body = serde_json::to_vec(&result).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to encode call result");
        serde_json::to_vec(&ErrorEnvelope::from_error_code(ErrorCode::Unknown)).unwrap_or_default()
    });
    Transcoded {
        format: WireFormat::Json,
        body: Bytes::from(body),
    }
}
