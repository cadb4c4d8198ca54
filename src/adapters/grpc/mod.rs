//! gRPC clients for the gateway's backend collaborators.
//!
//! Messages and client stubs are generated from `proto/gateway.proto` at
//! build time.
pub mod aaa_client;
pub mod channel;
pub mod cloud_client;
pub mod proto;
#[cfg(test)]
mod test_server;
pub mod token_client;

pub use aaa_client::GrpcAaaVerifier;
pub use channel::RpcChannelFactory;
pub use cloud_client::GrpcCloudExecutor;
pub use token_client::GrpcTokenStore;
