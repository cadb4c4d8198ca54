//! Generated `cloudgate.v1` messages and clients, plus their conversions to
//! the gateway's model.
pub mod v1 {
    tonic::include_proto!("cloudgate.v1");
}

pub use v1::{
    AaaVerifyRequest, AaaVerifyResponse, CloudApiBack, CloudApiCall, TokenBack, TokenCall,
    aaa_service_client::AaaServiceClient,
    cloud_execution_service_client::CloudExecutionServiceClient,
    token_service_client::TokenServiceClient,
};

use crate::core::model::{CallDescriptor, CallResult, CloudCredential};

impl From<TokenBack> for CloudCredential {
    fn from(back: TokenBack) -> Self {
        CloudCredential::new(back.id, back.key)
    }
}

impl From<&CallDescriptor> for CloudApiCall {
    fn from(call: &CallDescriptor) -> Self {
        Self {
            cloud: call.provider.clone(),
            service: call.service.clone(),
            action: call.action.clone(),
            region: call.region.clone(),
            cloud_id: call.credential.account_id.clone(),
            cloud_key: call.credential.account_key.clone(),
            params: call.parameters.clone(),
        }
    }
}

impl From<CloudApiBack> for CallResult {
    fn from(back: CloudApiBack) -> Self {
        CallResult {
            code: back.code,
            message: back.msg,
            data: String::from_utf8_lossy(&back.data).into_owned(),
        }
    }
}
