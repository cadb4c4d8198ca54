//! Provider to supported-services catalog.
use std::sync::Arc;

use serde_json::Value;

use crate::core::documents::CachedDocument;

/// `true` when `document[provider]` is a list containing `service`.
pub fn catalog_contains(document: &Value, provider: &str, service: &str) -> bool {
    document
        .get(provider)
        .and_then(Value::as_array)
        .is_some_and(|services| services.iter().any(|s| s.as_str() == Some(service)))
}

pub struct ServiceCatalog {
    document: Arc<CachedDocument>,
}

impl ServiceCatalog {
    pub fn new(document: Arc<CachedDocument>) -> Self {
        Self { document }
    }

    /// An unreadable catalog supports nothing.
    pub async fn supports(&self, provider: &str, service: &str) -> bool {
        match self.document.current().await {
            Some(document) => catalog_contains(&document, provider, service),
            None => false,
        }
    }

    pub fn document(&self) -> &Arc<CachedDocument> {
        &self.document
    }
}
