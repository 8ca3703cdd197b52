//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → overrides.rs (CLI flags / environment)
//!     → validation.rs (semantic checks)
//!     → WorkerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use overrides::ConfigOverrides;
pub use schema::WorkerConfig;
pub use schema::{
    AggregatorConfig, LogFormat, ObservabilityConfig, ShutdownConfig, TransmitConfig,
    UploadMethod, WaitfileConfig,
};
