//! Logical action name to provider-native action translation.
//!
//! The mapping document is a three-level object keyed
//! `action -> provider -> service -> providerAction`. Any missing level, and
//! any node of the wrong JSON type, is a miss.
use std::sync::Arc;

use serde_json::Value;

use crate::core::documents::CachedDocument;

/// Look up a provider action in an already loaded mapping document.
pub fn lookup_action(table: &Value, provider: &str, service: &str, action: &str) -> Option<String> {
    table
        .as_object()?
        .get(action)?
        .as_object()?
        .get(provider)?
        .as_object()?
        .get(service)?
        .as_str()
        .map(str::to_string)
}

pub struct ActionMapper {
    document: Arc<CachedDocument>,
}

impl ActionMapper {
    pub fn new(document: Arc<CachedDocument>) -> Self {
        Self { document }
    }

    /// Translate `action` for `(provider, service)`; `None` on any miss.
    pub async fn map(&self, provider: &str, service: &str, action: &str) -> Option<String> {
        let table = self.document.current().await?;
        let mapped = lookup_action(&table, provider, service, action);
        if mapped.is_none() {
            tracing::debug!(provider, service, action, "no action mapping");
        }
        mapped
    }

    pub fn document(&self) -> &Arc<CachedDocument> {
        &self.document
    }
}
