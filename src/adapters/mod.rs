pub mod document_source;
pub mod fault_reporter;
pub mod grpc;
pub mod http_handler;

/// Re-export commonly used types from adapters
pub use document_source::FileDocumentSource;
pub use fault_reporter::TracingFaultReporter;
pub use grpc::{GrpcAaaVerifier, GrpcCloudExecutor, GrpcTokenStore, RpcChannelFactory};
pub use http_handler::{AppState, router};
