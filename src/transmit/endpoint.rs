//! Results route construction.
//!
//! The aggregator accepts results at
//! `/api/v1/results/global/{plugin}` for cluster-wide plugins and
//! `/api/v1/results/by-node/{node}/{plugin}` for per-node plugins.

use url::Url;

use crate::config::AggregatorConfig;
use crate::error::TransmitError;

/// Where a plugin's results are uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEndpoint {
    url: Url,
}

impl ResultEndpoint {
    /// Build the route under `base` for `plugin`, optionally scoped to `node`.
    pub fn new(base: &Url, plugin: &str, node: Option<&str>) -> Result<Self, TransmitError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TransmitError::CannotBeABase(base.clone()))?;
            segments.pop_if_empty().extend(["api", "v1", "results"]);
            match node {
                Some(node) => segments.extend(["by-node", node, plugin]),
                None => segments.extend(["global", plugin]),
            };
        }
        Ok(Self { url })
    }

    /// Resolve from configuration. A URL that already carries a path is
    /// taken as the complete results URL.
    pub fn from_config(config: &AggregatorConfig) -> Result<Self, TransmitError> {
        let url = Url::parse(&config.url)?;
        if !url.path().is_empty() && url.path() != "/" {
            return Ok(Self { url });
        }

        let plugin = config
            .plugin
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| TransmitError::MissingPlugin(url.clone()))?;
        let node = config
            .node
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        Self::new(&url, plugin, node)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}
