//! cloudgate - a multi-cloud API gateway.
//!
//! cloudgate accepts normalized "call this provider API" requests over HTTP,
//! authenticates the caller, resolves the provider credential, forwards the
//! call to a cloud execution service over gRPC and returns the provider's
//! answer in the provider's native encoding.
//!
//! # Entry points
//! - `POST /v1/cloud/token`: register a provider credential for the caller
//! - `POST /v1/cloud/{provider}/{service}`: call with a stored credential
//! - `POST /v1/raw/cloud/{provider}/{service}`: call with an inline
//!   credential, authorized by the shared open token
//! - `GET /version`: configured version string
//!
//! Every rejection is an [`ErrorEnvelope`](core::ErrorEnvelope)
//! `{code, data}` sent with HTTP 200; the numeric code is the contract.
//!
//! # Architecture
//! The crate separates **ports** (traits) from **adapters** (implementations) while keeping
//! the pipeline logic inside `core`:
//! - [`core`]: validation, authentication, credential resolution, action mapping,
//!   pagination planning, dispatch and transcoding
//! - [`ports`]: AAA verifier, token store, cloud executor, document source, fault reporter
//! - [`adapters`]: tonic clients, file-backed documents, the axum router
//!
//! # Quick Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use cloudgate::{
//!     adapters::{
//!         AppState, FileDocumentSource, GrpcAaaVerifier, GrpcCloudExecutor, GrpcTokenStore,
//!         RpcChannelFactory, TracingFaultReporter, router,
//!     },
//!     core::{CloudGateway, GatewayPorts, GatewaySettings},
//! };
//!
//! # #[tokio::main] async fn main() -> eyre::Result<()> {
//! let timeout = std::time::Duration::from_secs(3);
//! let channels = |uri: &str| RpcChannelFactory::new(uri, timeout, timeout);
//! let gateway = CloudGateway::new(
//!     GatewaySettings::default(),
//!     GatewayPorts {
//!         aaa: Arc::new(GrpcAaaVerifier::new(channels("http://127.0.0.1:50051")?)),
//!         token_store: Arc::new(GrpcTokenStore::new(channels("http://127.0.0.1:50052")?)),
//!         executor: Arc::new(GrpcCloudExecutor::new(channels("http://127.0.0.1:50053")?)),
//!         action_map: Arc::new(FileDocumentSource::new("ActionMap.json")),
//!         service_catalog: Arc::new(FileDocumentSource::new("cloud.json")),
//!         reporter: Arc::new(TracingFaultReporter),
//!     },
//! );
//! let app = router(AppState::new(Arc::new(gateway), 1 << 20, "v1"));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(()) }
//! ```
//!
//! # Error Handling
//! Startup code returns `eyre::Result<T>`; request-path stages return
//! [`GatewayResult`](core::GatewayResult) and never panic across the handler
//! boundary.
pub mod config;
pub mod metrics;
pub mod ports;
pub mod tracing_setup;
pub mod utils;

pub mod adapters;
pub mod core;

// Re-export the specific types needed by the binary crate
pub use crate::{
    adapters::{AppState, router},
    core::{CloudGateway, GatewayPorts, GatewaySettings},
    utils::GracefulShutdown,
};
