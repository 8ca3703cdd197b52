//! OS signal handling.
//!
//! # Responsibilities
//! - Register for SIGTERM (and Ctrl-C) at startup
//! - Translate the first occurrence into a shutdown request
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Single-shot: the listener exits after the first signal and is not re-armed
//! - The receiver handed back is subscribed to the channel the listener triggers

use tokio::sync::broadcast;

use crate::lifecycle::shutdown::Shutdown;

/// Start listening for the platform's termination notification.
///
/// The SIGTERM stream is registered before this returns, so a signal
/// delivered right after the call is never lost.
pub fn listen(shutdown: &Shutdown) -> broadcast::Receiver<()> {
    let rx = shutdown.subscribe();
    let termination = Termination::register();
    let shutdown = shutdown.clone();

    tokio::spawn(async move {
        let signal = termination.recv().await;
        tracing::info!(
            signal,
            "Got a signal, waiting for plugin results before shutting down"
        );
        shutdown.trigger();
    });

    rx
}

struct Termination {
    #[cfg(unix)]
    sigterm: Option<tokio::signal::unix::Signal>,
}

impl Termination {
    #[cfg(unix)]
    fn register() -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        let sigterm = match signal(SignalKind::terminate()) {
            Ok(stream) => Some(stream),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to register SIGTERM handler, listening for Ctrl-C only"
                );
                None
            }
        };
        Self { sigterm }
    }

    #[cfg(not(unix))]
    fn register() -> Self {
        Self {}
    }

    #[cfg(unix)]
    async fn recv(self) -> &'static str {
        match self.sigterm {
            Some(mut sigterm) => tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                _ = ctrl_c() => "SIGINT",
            },
            None => {
                ctrl_c().await;
                "SIGINT"
            }
        }
    }

    #[cfg(not(unix))]
    async fn recv(self) -> &'static str {
        ctrl_c().await;
        "SIGINT"
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
