//! HTTP upload of result files.
//!
//! # Responsibilities
//! - Build the reqwest client (timeouts, optional mutual TLS)
//! - Stream the result file to the aggregator
//! - Map transport failures and non-2xx answers to `TransmitError`
//!
//! # Design Decisions
//! - One attempt per call; the caller decides what a failure means
//! - The body streams straight from the open file handle

use std::path::Path;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::{TransmitConfig, UploadMethod};
use crate::error::TransmitError;
use crate::transmit::Transmit;
use crate::worker::artifact::Artifact;

/// Longest response body kept in an `UnexpectedStatus` error.
const MAX_ERROR_BODY: usize = 512;

/// Build the HTTP client used to reach the aggregator.
pub fn build_client(config: &TransmitConfig) -> Result<reqwest::Client, TransmitError> {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(concat!("waitfile-worker/", env!("CARGO_PKG_VERSION")));

    if let Some(ca_path) = &config.ca_cert_path {
        let pem = read_pem(ca_path)?;
        let cert = reqwest::Certificate::from_pem(&pem).map_err(TransmitError::Client)?;
        builder = builder.add_root_certificate(cert);
        tracing::debug!(path = %ca_path.display(), "Loaded aggregator CA bundle");
    }

    if let (Some(cert_path), Some(key_path)) = (&config.client_cert_path, &config.client_key_path) {
        let mut pem = read_pem(cert_path)?;
        pem.push(b'\n');
        pem.extend(read_pem(key_path)?);
        let identity = reqwest::Identity::from_pem(&pem).map_err(TransmitError::Client)?;
        builder = builder.identity(identity);
        tracing::debug!(path = %cert_path.display(), "Loaded client certificate");
    }

    builder.build().map_err(TransmitError::Client)
}

fn read_pem(path: &Path) -> Result<Vec<u8>, TransmitError> {
    std::fs::read(path).map_err(|source| TransmitError::Tls {
        path: path.to_path_buf(),
        source,
    })
}

/// Uploads result files with a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransmitter {
    client: reqwest::Client,
    method: UploadMethod,
}

impl HttpTransmitter {
    pub fn new(client: reqwest::Client, method: UploadMethod) -> Self {
        Self { client, method }
    }

    /// Build the client from configuration.
    pub fn from_config(config: &TransmitConfig, method: UploadMethod) -> Result<Self, TransmitError> {
        Ok(Self::new(build_client(config)?, method))
    }

    pub fn method(&self) -> UploadMethod {
        self.method
    }
}

impl Transmit for HttpTransmitter {
    async fn transmit(&self, url: &Url, artifact: Artifact) -> Result<(), TransmitError> {
        let content_type = artifact.content_type();
        let bytes = artifact.len();
        let body = reqwest::Body::from(artifact.into_file());

        let mut request = match self.method {
            UploadMethod::Put => self.client.put(url.clone()),
            UploadMethod::Post => self.client.post(url.clone()),
        }
        .body(body);
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }

        tracing::debug!(url = %url, bytes, method = ?self.method, "Sending result file");

        let response = request.send().await.map_err(|source| TransmitError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransmitError::UnexpectedStatus {
                url: url.clone(),
                status,
                body: truncate(body, MAX_ERROR_BODY),
            });
        }

        tracing::debug!(url = %url, status = %status, "Aggregator accepted results");
        Ok(())
    }
}

fn truncate(mut text: String, max: usize) -> String {
    if text.len() > max {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}
