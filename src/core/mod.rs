pub mod action_map;
pub mod authenticator;
pub mod catalog;
pub mod credentials;
pub mod dispatcher;
pub mod documents;
pub mod error;
pub mod gateway;
pub mod model;
pub mod pagination;
pub mod provider;
pub mod request;
#[cfg(test)]
pub(crate) mod test_support;
pub mod transcoder;
pub mod validator;

pub use dispatcher::CallDispatcher;
pub use error::{ErrorCode, ErrorEnvelope, GatewayError, GatewayResult};
pub use gateway::{CloudGateway, GatewayPorts, GatewaySettings};
pub use model::{AuthenticationToken, CallDescriptor, CallResult, CloudCredential};
