//! Waitfile worker library.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod transmit;
pub mod worker;

pub use config::schema::WorkerConfig;
pub use error::{TransmitError, WorkerError};
pub use lifecycle::Shutdown;
pub use transmit::{HttpTransmitter, Transmit};
pub use worker::{gather_results, GatherConfig, GatherOutcome};
