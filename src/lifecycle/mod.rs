//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger (once)
//!
//! Shutdown (shutdown.rs):
//!     broadcast → gather loop starts its grace period
//! ```
//!
//! # Design Decisions
//! - Shutdown is a request, not an exit: the loop keeps polling
//! - Shutdown has timeout: the grace period bounds how long we wait

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
