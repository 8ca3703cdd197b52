//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0)
//! - Check the aggregator URL and that a results route can be built
//! - Check the metrics listen address when metrics are enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WorkerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::WorkerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &WorkerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.waitfile.path.as_os_str().is_empty() {
        errors.push(ValidationError::new("waitfile.path", "must not be empty"));
    }
    if config.waitfile.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "waitfile.poll_interval_ms",
            "must be greater than zero",
        ));
    }

    match Url::parse(&config.aggregator.url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::new(
                    "aggregator.url",
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            let has_route = url.path() != "/" && !url.path().is_empty();
            let has_plugin = config
                .aggregator
                .plugin
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty());
            if !has_route && !has_plugin {
                errors.push(ValidationError::new(
                    "aggregator.plugin",
                    "required when aggregator.url has no results path",
                ));
            }
        }
        Err(e) => {
            errors.push(ValidationError::new(
                "aggregator.url",
                format!("invalid URL '{}': {}", config.aggregator.url, e),
            ));
        }
    }

    if config.transmit.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "transmit.connect_timeout_secs",
            "must be greater than zero",
        ));
    }
    if config.transmit.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "transmit.request_timeout_secs",
            "must be greater than zero",
        ));
    }
    if config.transmit.client_cert_path.is_some() != config.transmit.client_key_path.is_some() {
        errors.push(ValidationError::new(
            "transmit.client_cert_path",
            "client_cert_path and client_key_path must be set together",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "invalid socket address '{}'",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
