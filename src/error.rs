//! Error definitions for the worker.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

pub use crate::config::ConfigError;

/// Errors reported by the transmission primitive.
#[derive(Debug, Error)]
pub enum TransmitError {
    /// The request could not be sent or the connection failed.
    #[error("error encountered dialing aggregator at {url}: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// The aggregator answered with a non-success status.
    #[error("got a {status} response when sending results to {url}: {body}")]
    UnexpectedStatus {
        url: Url,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A TLS certificate or key could not be read.
    #[error("failed to read TLS material {}: {source}", .path.display())]
    Tls {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The results URL could not be built.
    #[error("invalid aggregator URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The aggregator URL has no path to extend, e.g. `mailto:`.
    #[error("aggregator URL {0} cannot carry a results route")]
    CannotBeABase(Url),

    /// A bare aggregator URL was given without a plugin name.
    #[error("no plugin name to build a results route under {0}")]
    MissingPlugin(Url),
}

/// Errors that end the gather loop.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The result file named by the waitfile could not be opened.
    #[error("failed to open result file {}: {source}", .path.display())]
    OpenArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The result file could not be transmitted.
    #[error("failed to transmit results: {0}")]
    Transmit(#[from] TransmitError),

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for worker operations.
pub type WorkerResult<T> = Result<T, WorkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_artifact_message_names_path() {
        let err = WorkerError::OpenArtifact {
            path: PathBuf::from("/tmp/results.tar.gz"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/results.tar.gz"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_status_error_message() {
        let err = TransmitError::UnexpectedStatus {
            url: Url::parse("http://agg:8080/api/v1/results/global/e2e").unwrap(),
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream down".into(),
        };
        let wrapped = WorkerError::from(err);
        let msg = wrapped.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("upstream down"));
    }

    #[test]
    fn test_config_error_passes_through() {
        let err = WorkerError::from(ConfigError::Validation(Vec::new()));
        assert!(matches!(err, WorkerError::Config(_)));
        assert!(err.to_string().starts_with("validation failed"));
    }
}
