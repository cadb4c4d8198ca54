//! Request-scoped data model shared by every stage of the dispatch pipeline.
//!
//! None of these values outlive a single inbound request. Secrets carried by
//! [`AuthenticationToken`] and [`CloudCredential`] are redacted from `Debug`
//! output so they never reach the logs.
use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

/// Result code reserved for RPC transport or backend failures.
pub const TRANSPORT_FAILURE: i64 = -1;

/// Caller identity plus signature, verified by the AAA collaborator.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationToken {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub signature: String,
}

impl AuthenticationToken {
    pub fn new(id: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            signature: signature.into(),
        }
    }
}

impl fmt::Debug for AuthenticationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationToken")
            .field("id", &self.id)
            .field("signature", &"<redacted>")
            .finish()
    }
}

/// A provider account secret pair. Only ever held for one request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CloudCredential {
    pub account_id: String,
    pub account_key: String,
}

impl CloudCredential {
    pub fn new(account_id: impl Into<String>, account_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            account_key: account_key.into(),
        }
    }

    /// The pair returned when a lookup fails or finds nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An empty account id means there is no usable credential.
    pub fn is_usable(&self) -> bool {
        !self.account_id.is_empty()
    }
}

impl fmt::Debug for CloudCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudCredential")
            .field("account_id", &self.account_id)
            .field("account_key", &"<redacted>")
            .finish()
    }
}

/// Provider-agnostic unit of work sent to the cloud execution service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallDescriptor {
    pub provider: String,
    pub service: String,
    pub action: String,
    pub region: String,
    pub credential: CloudCredential,
    pub parameters: HashMap<String, String>,
}

impl CallDescriptor {
    pub fn new(
        provider: impl Into<String>,
        service: impl Into<String>,
        action: impl Into<String>,
        region: impl Into<String>,
        credential: CloudCredential,
    ) -> Self {
        Self {
            provider: provider.into(),
            service: service.into(),
            action: action.into(),
            region: region.into(),
            credential,
            parameters: HashMap::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: HashMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Name of the first identifying field that is still empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.provider.is_empty() {
            Some("provider")
        } else if self.service.is_empty() {
            Some("service")
        } else if self.action.is_empty() {
            Some("action")
        } else {
            None
        }
    }
}

/// Outcome of one call to the cloud execution service.
///
/// `code == 0` is success and `data` holds the provider payload verbatim.
/// [`TRANSPORT_FAILURE`] marks a failure that happened before or inside the
/// RPC layer; any other non-zero code is a provider-reported failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResult {
    pub code: i64,
    #[serde(rename = "msg")]
    pub message: String,
    pub data: String,
}

impl CallResult {
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            code: 0,
            message: String::new(),
            data: data.into(),
        }
    }

    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: String::new(),
        }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::failure(TRANSPORT_FAILURE, message)
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}
