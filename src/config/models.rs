//! Configuration data structures for cloudgate.
//!
//! These types map directly to TOML (also JSON / YAML) configuration files and
//! include defaults so that minimal configs remain concise. Durations are
//! humantime strings (`"3s"`, `"500ms"`) and are parsed when the runtime
//! settings are derived.
use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    config::validation::{ValidationError, ValidationResult},
    core::GatewaySettings,
};

/// AAA (private token verification) collaborator
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AaaConfig {
    /// When false, credential registration skips verification
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for AaaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://127.0.0.1:50051".to_string(),
        }
    }
}

/// Backend RPC collaborators
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RpcConfig {
    pub token_service: String,
    pub cloud_service: String,
    pub connect_timeout: String,
    /// Deadline of a single cloud call
    pub call_timeout: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            token_service: "http://127.0.0.1:50052".to_string(),
            cloud_service: "http://127.0.0.1:50053".to_string(),
            connect_timeout: "3s".to_string(),
            call_timeout: "30s".to_string(),
        }
    }
}

/// Action name mapping table
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ActionMapConfig {
    pub path: String,
    /// `"0s"` re-reads the file on every lookup
    pub cache_ttl: String,
    pub watch: bool,
    pub map_private_calls: bool,
    pub map_raw_calls: bool,
}

impl Default for ActionMapConfig {
    fn default() -> Self {
        Self {
            path: "ActionMap.json".to_string(),
            cache_ttl: "30s".to_string(),
            watch: true,
            map_private_calls: false,
            map_raw_calls: false,
        }
    }
}

/// Provider to supported-services catalog
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceCatalogConfig {
    pub path: String,
    pub cache_ttl: String,
    pub watch: bool,
    /// Reject calls to services missing from the catalog
    pub enforce: bool,
}

impl Default for ServiceCatalogConfig {
    fn default() -> Self {
        Self {
            path: "cloud.json".to_string(),
            cache_ttl: "30s".to_string(),
            watch: true,
            enforce: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

/// Top-level gateway configuration
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    pub listen_addr: String,
    /// Reported by `GET /version`
    pub version: String,
    /// Shared secret of the raw entry point; empty rejects every raw call
    pub open_token: String,
    pub max_body_bytes: usize,
    /// Time allowed for in-flight requests after a shutdown signal
    pub shutdown_timeout: String,
    pub aaa: AaaConfig,
    pub rpc: RpcConfig,
    pub action_map: ActionMapConfig,
    pub service_catalog: ServiceCatalogConfig,
    pub logging: LoggingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            version: "v1".to_string(),
            open_token: String::new(),
            max_body_bytes: 1024 * 1024,
            shutdown_timeout: "30s".to_string(),
            aaa: AaaConfig::default(),
            rpc: RpcConfig::default(),
            action_map: ActionMapConfig::default(),
            service_catalog: ServiceCatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("listen_addr", &self.listen_addr)
            .field("version", &self.version)
            .field(
                "open_token",
                &if self.open_token.is_empty() { "" } else { "<redacted>" },
            )
            .field("max_body_bytes", &self.max_body_bytes)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .field("aaa", &self.aaa)
            .field("rpc", &self.rpc)
            .field("action_map", &self.action_map)
            .field("service_catalog", &self.service_catalog)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Parse a humantime duration, naming `field` on failure.
pub fn parse_duration(field: &str, value: &str) -> ValidationResult<Duration> {
    humantime::parse_duration(value).map_err(|e| ValidationError::InvalidField {
        field: field.to_string(),
        message: format!("'{value}' is not a duration: {e}"),
    })
}

impl GatewayConfig {
    pub fn connect_timeout(&self) -> ValidationResult<Duration> {
        parse_duration("rpc.connect_timeout", &self.rpc.connect_timeout)
    }

    pub fn call_timeout(&self) -> ValidationResult<Duration> {
        parse_duration("rpc.call_timeout", &self.rpc.call_timeout)
    }

    pub fn shutdown_timeout(&self) -> ValidationResult<Duration> {
        parse_duration("shutdown_timeout", &self.shutdown_timeout)
    }

    /// Derive the pipeline policy from this configuration.
    pub fn gateway_settings(&self) -> ValidationResult<GatewaySettings> {
        Ok(GatewaySettings {
            aaa_enabled: self.aaa.enabled,
            open_token: self.open_token.clone(),
            call_deadline: self.call_timeout()?,
            action_map_ttl: parse_duration("action_map.cache_ttl", &self.action_map.cache_ttl)?,
            service_catalog_ttl: parse_duration(
                "service_catalog.cache_ttl",
                &self.service_catalog.cache_ttl,
            )?,
            map_private_calls: self.action_map.map_private_calls,
            map_raw_calls: self.action_map.map_raw_calls,
            enforce_service_catalog: self.service_catalog.enforce,
        })
    }
}
