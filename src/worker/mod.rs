//! Results worker subsystem.
//!
//! # Data Flow
//! ```text
//! plugin writes result file, then waitfile
//!     → waitfile.rs (poll: missing / unreadable / ready)
//!     → gather.rs (state machine, grace period)
//!     → artifact.rs (open handle, content_type.rs lookup)
//!     → transmit (upload to aggregator)
//! ```

pub mod artifact;
pub mod content_type;
pub mod gather;
pub mod waitfile;

pub use artifact::Artifact;
pub use content_type::content_type_for;
pub use gather::{gather_results, handle_waitfile, GatherConfig, GatherOutcome, WorkerState};
pub use waitfile::WaitfileStatus;
