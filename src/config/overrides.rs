//! Command-line and environment overrides.
//!
//! Applied on top of the file configuration; anything unset leaves the
//! file (or default) value in place.

use std::path::PathBuf;

use crate::config::schema::{LogFormat, WorkerConfig};

/// Overrides collected from CLI flags and their environment variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub waitfile: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
    pub url: Option<String>,
    pub plugin: Option<String>,
    pub node: Option<String>,
    pub grace_period_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    /// Setting an address also enables the metrics endpoint.
    pub metrics_address: Option<String>,
}

impl ConfigOverrides {
    /// Apply the overrides onto `config`.
    pub fn apply(self, config: &mut WorkerConfig) {
        if let Some(path) = self.waitfile {
            config.waitfile.path = path;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.waitfile.poll_interval_ms = ms;
        }
        if let Some(url) = self.url {
            config.aggregator.url = url;
        }
        if let Some(plugin) = self.plugin {
            config.aggregator.plugin = Some(plugin);
        }
        if let Some(node) = self.node {
            config.aggregator.node = Some(node);
        }
        if let Some(secs) = self.grace_period_secs {
            config.shutdown.grace_period_secs = secs;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(address) = self.metrics_address {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = address;
        }
    }
}
