//! Error taxonomy and the uniform error envelope.
//!
//! The numeric codes are part of the public wire contract and must never be
//! renumbered.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed error code taxonomy carried in [`ErrorEnvelope::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    AuthenticationFailed,
    BadRequest,
    Timeout,
    Forbidden,
    InvalidOpenToken,
    Abuse,
    MessagingFailure,
    StorageFailure,
    RpcFailure,
    Unknown,
}

impl ErrorCode {
    pub fn code(self) -> i64 {
        match self {
            ErrorCode::AuthenticationFailed => 1,
            ErrorCode::BadRequest => 2,
            ErrorCode::Timeout => 3,
            ErrorCode::Forbidden => 4,
            ErrorCode::InvalidOpenToken => 5,
            ErrorCode::Abuse => 10,
            ErrorCode::MessagingFailure => 125,
            ErrorCode::StorageFailure => 126,
            ErrorCode::RpcFailure => 127,
            ErrorCode::Unknown => 100,
        }
    }

    /// Map a raw code back to the taxonomy; anything unlisted is `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ErrorCode::AuthenticationFailed,
            2 => ErrorCode::BadRequest,
            3 => ErrorCode::Timeout,
            4 => ErrorCode::Forbidden,
            5 => ErrorCode::InvalidOpenToken,
            10 => ErrorCode::Abuse,
            125 => ErrorCode::MessagingFailure,
            126 => ErrorCode::StorageFailure,
            127 => ErrorCode::RpcFailure,
            _ => ErrorCode::Unknown,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            // 1 - 10: the request itself was rejected
            ErrorCode::AuthenticationFailed => "[Failed] AAA Failed",
            ErrorCode::BadRequest => "[Failed] Params missing or incorrect",
            ErrorCode::Timeout => "[Failed] Request Timeout",
            ErrorCode::Forbidden => "[Failed] Request Forbidden",
            ErrorCode::InvalidOpenToken => "[Failed] Invalid Public Token",
            ErrorCode::Abuse => "[Failed] Do not hack the system",
            // 100 - 120: system, 120 - 127: middleware
            ErrorCode::MessagingFailure => "[Error] MQ crash",
            ErrorCode::StorageFailure => "[Error] DB crash",
            ErrorCode::RpcFailure => "[Error] RPC crash",
            ErrorCode::Unknown => "[Error] Unknown problem",
        }
    }
}

/// Body of every non-success HTTP response (and of the registration success).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: i64,
    pub data: serde_json::Value,
}

impl ErrorEnvelope {
    pub fn new(code: i64, data: impl Into<serde_json::Value>) -> Self {
        Self {
            code,
            data: data.into(),
        }
    }

    pub fn from_error_code(code: ErrorCode) -> Self {
        Self::new(code.code(), code.message())
    }

    pub fn success() -> Self {
        Self::new(0, "Success")
    }
}

impl From<ErrorCode> for ErrorEnvelope {
    fn from(code: ErrorCode) -> Self {
        Self::from_error_code(code)
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        // The envelope code is the contract; transport status stays 200.
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Request-terminal failures raised by the pipeline stages.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("request must follow application/json")]
    UnsupportedContentType,

    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid open token")]
    InvalidOpenToken,

    #[error("request forbidden: {0}")]
    Forbidden(String),

    #[error("request timed out")]
    Timeout,

    #[error("RPC failure: {0}")]
    Rpc(String),

    #[error("internal fault: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            GatewayError::UnsupportedContentType | GatewayError::BadRequest(_) => {
                ErrorCode::BadRequest
            }
            GatewayError::AuthenticationFailed => ErrorCode::AuthenticationFailed,
            GatewayError::InvalidOpenToken => ErrorCode::InvalidOpenToken,
            GatewayError::Forbidden(_) => ErrorCode::Forbidden,
            GatewayError::Timeout => ErrorCode::Timeout,
            GatewayError::Rpc(_) => ErrorCode::RpcFailure,
            GatewayError::Internal(_) => ErrorCode::Unknown,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            // Content-type rejections keep their own wording under code 2.
            GatewayError::UnsupportedContentType => {
                ErrorEnvelope::new(ErrorCode::BadRequest.code(), self.to_string())
            }
            _ => ErrorEnvelope::from_error_code(self.error_code()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, code = self.error_code().code(), "request rejected");
        self.envelope().into_response()
    }
}

/// Result type alias for pipeline stages.
pub type GatewayResult<T> = Result<T, GatewayError>;
