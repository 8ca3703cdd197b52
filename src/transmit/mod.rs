//! Transmission primitive.
//!
//! # Data Flow
//! ```text
//! gather loop
//!     → Artifact (open handle + content type)
//!     → Transmit::transmit(url, artifact)
//!     → aggregator results route (endpoint.rs)
//! ```

pub mod endpoint;
pub mod http;

use std::future::Future;

use url::Url;

use crate::error::TransmitError;
use crate::worker::artifact::Artifact;

pub use endpoint::ResultEndpoint;
pub use http::{build_client, HttpTransmitter};

/// Uploads one result file to `url`.
///
/// Implementations consume the artifact, so its file handle is released
/// when the call returns, whatever the outcome.
pub trait Transmit {
    fn transmit(
        &self,
        url: &Url,
        artifact: Artifact,
    ) -> impl Future<Output = Result<(), TransmitError>> + Send;
}
