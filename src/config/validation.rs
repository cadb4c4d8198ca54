use std::{net::SocketAddr, sync::LazyLock};

use regex::Regex;

use crate::config::models::{GatewayConfig, parse_duration};

static ENDPOINT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^https?://[A-Za-z0-9.\-\[\]:]+(:\d{1,5})?/?$").ok());

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid listen address '{address}': {reason}")]
    InvalidListenAddress { address: String, reason: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Gateway configuration validator
pub struct GatewayConfigValidator;

impl GatewayConfigValidator {
    /// Validate the entire configuration, reporting every problem at once.
    pub fn validate(config: &GatewayConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_listen_address(&config.listen_addr) {
            errors.push(e);
        }

        if config.max_body_bytes == 0 {
            errors.push(ValidationError::InvalidField {
                field: "max_body_bytes".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        let endpoints = [
            ("aaa.endpoint", &config.aaa.endpoint),
            ("rpc.token_service", &config.rpc.token_service),
            ("rpc.cloud_service", &config.rpc.cloud_service),
        ];
        for (field, endpoint) in endpoints {
            if let Err(e) = Self::validate_endpoint(field, endpoint) {
                errors.push(e);
            }
        }

        let durations = [
            ("rpc.connect_timeout", &config.rpc.connect_timeout),
            ("action_map.cache_ttl", &config.action_map.cache_ttl),
            ("service_catalog.cache_ttl", &config.service_catalog.cache_ttl),
            ("shutdown_timeout", &config.shutdown_timeout),
        ];
        for (field, value) in durations {
            if let Err(e) = parse_duration(field, value) {
                errors.push(e);
            }
        }

        match config.call_timeout() {
            Ok(timeout) if timeout.is_zero() => errors.push(ValidationError::InvalidField {
                field: "rpc.call_timeout".to_string(),
                message: "Every call needs a deadline; must be greater than 0".to_string(),
            }),
            Ok(_) => {}
            Err(e) => errors.push(e),
        }

        for (field, path) in [
            ("action_map.path", &config.action_map.path),
            ("service_catalog.path", &config.service_catalog.path),
        ] {
            if path.trim().is_empty() {
                errors.push(ValidationError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        if config.open_token.is_empty() {
            tracing::warn!("open_token is empty, the raw entry point will reject every call");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::ValidationFailed {
                message: Self::format_multiple_errors(errors),
            })
        }
    }

    /// Validate listen address format
    fn validate_listen_address(address: &str) -> ValidationResult<()> {
        if address.parse::<SocketAddr>().is_err() {
            return Err(ValidationError::InvalidListenAddress {
                address: address.to_string(),
                reason: "Must be in format 'IP:PORT' (e.g., '127.0.0.1:3000' or '0.0.0.0:8080')"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// RPC endpoints are bare `http(s)://host[:port]` URIs.
    fn validate_endpoint(field: &str, endpoint: &str) -> ValidationResult<()> {
        if endpoint.is_empty() {
            return Err(ValidationError::MissingField {
                field: field.to_string(),
            });
        }

        let matches = ENDPOINT_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(endpoint));
        if !matches || endpoint.parse::<http::Uri>().is_err() {
            return Err(ValidationError::InvalidField {
                field: field.to_string(),
                message: format!("'{endpoint}' must look like 'http://host:port'"),
            });
        }
        Ok(())
    }

    /// Format multiple validation errors into a single message
    fn format_multiple_errors(errors: Vec<ValidationError>) -> String {
        if errors.len() == 1 {
            return errors[0].to_string();
        }

        let mut message = format!("Found {} validation errors:\n", errors.len());
        for (i, error) in errors.iter().enumerate() {
            message.push_str(&format!("  {}. {}\n", i + 1, error));
        }
        message
    }
}
