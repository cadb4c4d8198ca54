//! Inbound JSON payloads for the three call entry points.
use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    core::{
        error::{GatewayError, GatewayResult},
        model::{AuthenticationToken, CloudCredential},
    },
    ports::TokenRegistration,
};

/// Body of `POST /v1/cloud/{provider}/{service}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CloudApiRequest {
    pub token: AuthenticationToken,
    /// Name under which the caller stored the provider credential
    pub name: String,
    pub region: String,
    pub action: String,
    pub params: HashMap<String, String>,
}

/// Body of the raw entry point; the credential travels inline.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CloudApiRawRequest {
    /// Shared open token for pre-authorized integrations
    pub token: String,
    #[serde(rename = "cloudid")]
    pub cloud_id: String,
    #[serde(rename = "cloudkey")]
    pub cloud_key: String,
    pub region: String,
    pub action: String,
    pub params: HashMap<String, String>,
}

impl CloudApiRawRequest {
    pub fn credential(&self) -> CloudCredential {
        CloudCredential::new(self.cloud_id.clone(), self.cloud_key.clone())
    }
}

impl std::fmt::Debug for CloudApiRawRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudApiRawRequest")
            .field("cloud_id", &self.cloud_id)
            .field("region", &self.region)
            .field("action", &self.action)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /v1/cloud/token`.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenRegistrationRequest {
    pub token: AuthenticationToken,
    #[serde(alias = "cloud")]
    pub provider: String,
    pub name: String,
    pub id: String,
    pub key: String,
}

impl TokenRegistrationRequest {
    /// Require the fields the credential store keys on.
    pub fn validate(&self) -> GatewayResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("provider", &self.provider),
            ("id", &self.id),
        ] {
            if value.is_empty() {
                return Err(GatewayError::BadRequest(format!("missing field `{field}`")));
            }
        }
        Ok(())
    }

    pub fn into_registration(self) -> TokenRegistration {
        TokenRegistration {
            provider: self.provider,
            caller_id: self.token.id,
            name: self.name,
            credential: CloudCredential::new(self.id, self.key),
        }
    }
}

impl std::fmt::Debug for TokenRegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRegistrationRequest")
            .field("token", &self.token)
            .field("provider", &self.provider)
            .field("name", &self.name)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_requires_name_provider_id() {
        let complete: TokenRegistrationRequest = serde_json::from_str(concat!(
            r#"{"token":{"id":"u1","signature":"s"},"#,
            r#""provider":"qcloud","name":"prod","id":"AKID","key":"k"}"#,
        ))
        .unwrap();
        assert!(complete.validate().is_ok());

        for field in ["name", "provider", "id"] {
            let mut value = serde_json::json!({
                "token": {"id": "u1", "signature": "s"},
                "provider": "qcloud", "name": "prod", "id": "AKID", "key": "k"
            });
            value.as_object_mut().unwrap().remove(field);
            let request: TokenRegistrationRequest = serde_json::from_value(value).unwrap();
            assert!(
                matches!(request.validate(), Err(GatewayError::BadRequest(_))),
                "missing {field} must be rejected"
            );
        }
    }

    #[test]
    fn test_registration_accepts_cloud_alias() {
        let request: TokenRegistrationRequest =
            serde_json::from_str(r#"{"cloud":"aliyun","name":"n","id":"i"}"#).unwrap();
        assert_eq!(request.provider, "aliyun");
        assert_eq!(request.token, AuthenticationToken::default());
    }

    #[test]
    fn test_raw_request_field_names() {
        let request: CloudApiRawRequest = serde_json::from_str(concat!(
            r#"{"token":"open","cloudid":"AKID","cloudkey":"secret","#,
            r#""region":"us-east-1","action":"DescribeRegions","params":{"a":"b"}}"#,
        ))
        .unwrap();
        assert_eq!(request.credential(), CloudCredential::new("AKID", "secret"));
        assert_eq!(request.params.get("a").map(String::as_str), Some("b"));
        assert!(!format!("{request:?}").contains("secret"));
    }
}
