pub mod aaa;
pub mod cloud_executor;
pub mod document_source;
pub mod fault_reporter;
pub mod rpc;
pub mod token_store;

pub use aaa::{AaaError, AaaVerifier};
pub use cloud_executor::CloudExecutor;
pub use document_source::{DocumentError, DocumentSource};
pub use fault_reporter::FaultReporter;
pub use rpc::{RpcError, RpcResult};
pub use token_store::{TokenRegistration, TokenStore};
