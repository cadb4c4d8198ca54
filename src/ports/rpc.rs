use thiserror::Error;

/// Error type shared by the RPC-backed ports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RpcError {
    /// The channel to the collaborator could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// The collaborator did not answer before the deadline
    #[error("Deadline exceeded: {0}")]
    Timeout(String),

    /// The collaborator answered with a gRPC status other than OK
    #[error("Backend returned status {code}: {message}")]
    Status { code: String, message: String },

    /// The call was abandoned before an answer arrived
    #[error("Call cancelled: {0}")]
    Cancelled(String),
}

impl From<tonic::Status> for RpcError {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::DeadlineExceeded => RpcError::Timeout(status.message().to_string()),
            tonic::Code::Cancelled => RpcError::Cancelled(status.message().to_string()),
            code => RpcError::Status {
                code: format!("{code:?}"),
                message: status.message().to_string(),
            },
        }
    }
}

/// Result type alias for RPC-backed port operations
pub type RpcResult<T> = Result<T, RpcError>;
