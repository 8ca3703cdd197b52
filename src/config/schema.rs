//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the worker.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the results worker.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WorkerConfig {
    /// Where the plugin signals completion.
    pub waitfile: WaitfileConfig,

    /// Where results are sent.
    pub aggregator: AggregatorConfig,

    /// Graceful shutdown settings.
    pub shutdown: ShutdownConfig,

    /// HTTP client settings.
    pub transmit: TransmitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Waitfile location and polling cadence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WaitfileConfig {
    /// Path of the done file written by the plugin.
    pub path: PathBuf,

    /// Interval between waitfile checks in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for WaitfileConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/tmp/results/done"),
            poll_interval_ms: 1_000,
        }
    }
}

impl WaitfileConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// HTTP method used for the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UploadMethod {
    #[default]
    Put,
    Post,
}

/// Aggregator endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Aggregator base URL, or a complete results URL.
    pub url: String,

    /// Plugin name used to build the results route.
    pub plugin: Option<String>,

    /// Node name for per-node plugins. Global plugins leave this unset.
    pub node: Option<String>,

    /// Upload method.
    pub method: UploadMethod,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            plugin: None,
            node: None,
            method: UploadMethod::Put,
        }
    }
}

/// Shutdown behaviour once the scheduler asks the job to stop.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long to keep waiting for results after SIGTERM, in seconds.
    pub grace_period_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 60,
        }
    }
}

impl ShutdownConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}

/// HTTP client configuration for the upload.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransmitConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Optional CA bundle (PEM) used to verify the aggregator.
    pub ca_cert_path: Option<PathBuf>,

    /// Optional client certificate (PEM) for mutual TLS.
    pub client_cert_path: Option<PathBuf>,

    /// Optional client private key (PEM) for mutual TLS.
    pub client_key_path: Option<PathBuf>,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 300,
            ca_cert_path: None,
            client_cert_path: None,
            client_key_path: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}', expected 'pretty' or 'json'")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Serve Prometheus metrics.
    pub metrics_enabled: bool,

    /// Listen address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
