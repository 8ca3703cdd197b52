//! The watch-and-transmit loop.
//!
//! # Responsibilities
//! - Poll the waitfile on a fixed interval
//! - Start the grace period on the first shutdown request
//! - Hand the named result file to the transmission primitive
//!
//! # States
//! ```text
//! Waiting ──shutdown──▶ GracePeriod ──deadline──▶ Aborted
//!    │                      │
//!    └──waitfile ready──────┴──▶ Transmitting ──▶ Done
//! ```
//!
//! # Design Decisions
//! - Polling, not filesystem events: shared volumes differ across runtimes
//! - A timed-out grace period is `Ok(TimedOut)`, not an error
//! - Exactly one transmission attempt

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{self, Instant, MissedTickBehavior};
use url::Url;

use crate::config::WorkerConfig;
use crate::error::{TransmitError, WorkerResult};
use crate::observability::metrics;
use crate::transmit::{ResultEndpoint, Transmit};
use crate::worker::artifact::Artifact;
use crate::worker::waitfile::{self, WaitfileStatus};

/// Inputs of the gather loop.
#[derive(Debug, Clone)]
pub struct GatherConfig {
    /// Done file written by the plugin.
    pub waitfile: PathBuf,
    /// Results route on the aggregator.
    pub url: Url,
    /// Interval between waitfile checks.
    pub poll_interval: Duration,
    /// How long to keep waiting after a shutdown request.
    pub grace_period: Duration,
}

impl GatherConfig {
    pub fn new(waitfile: impl Into<PathBuf>, url: Url) -> Self {
        Self {
            waitfile: waitfile.into(),
            url,
            poll_interval: Duration::from_secs(1),
            grace_period: Duration::from_secs(60),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Derive loop inputs from the worker configuration.
    pub fn from_config(config: &WorkerConfig) -> Result<Self, TransmitError> {
        let endpoint = ResultEndpoint::from_config(&config.aggregator)?;
        Ok(Self::new(config.waitfile.path.clone(), endpoint.into_url())
            .with_poll_interval(config.waitfile.poll_interval())
            .with_grace_period(config.shutdown.grace_period()))
    }
}

/// How the loop ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatherOutcome {
    /// The result file was accepted by the aggregator.
    Transmitted { result_file: PathBuf },
    /// The grace period ran out before the plugin finished.
    TimedOut,
}

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Waiting,
    GracePeriod { deadline: Instant },
    Transmitting,
    Done,
    Aborted,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Waiting => "waiting",
            WorkerState::GracePeriod { .. } => "grace_period",
            WorkerState::Transmitting => "transmitting",
            WorkerState::Done => "done",
            WorkerState::Aborted => "aborted",
        }
    }

    fn deadline(&self) -> Option<Instant> {
        match self {
            WorkerState::GracePeriod { deadline } => Some(*deadline),
            _ => None,
        }
    }
}

fn transition(state: &mut WorkerState, next: WorkerState) {
    tracing::debug!(from = state.as_str(), to = next.as_str(), "Worker state change");
    *state = next;
}

/// Wait for the plugin's waitfile and transmit the result file it names.
///
/// Returns `Transmitted` once the aggregator accepts the upload, or
/// `TimedOut` if a shutdown request arrived and the grace period passed
/// with no waitfile. Open and transmission failures are returned as errors.
pub async fn gather_results<T: Transmit>(
    config: &GatherConfig,
    transmitter: &T,
    mut shutdown: broadcast::Receiver<()>,
) -> WorkerResult<GatherOutcome> {
    tracing::info!(waitfile = %config.waitfile.display(), "Waiting for waitfile");

    let mut ticker = time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut state = WorkerState::Waiting;
    let mut listening = true;

    loop {
        let deadline = state.deadline();

        tokio::select! {
            _ = ticker.tick() => {
                let status = waitfile::inspect(&config.waitfile).await;
                metrics::record_poll(status.label());

                match status {
                    WaitfileStatus::Ready(result_file) => {
                        tracing::info!(
                            result_file = %result_file.display(),
                            "Detected done file, transmitting result file"
                        );
                        transition(&mut state, WorkerState::Transmitting);
                        let result = handle_waitfile(result_file.clone(), &config.url, transmitter).await;
                        transition(&mut state, WorkerState::Done);
                        return result.map(|()| GatherOutcome::Transmitted { result_file });
                    }
                    WaitfileStatus::Missing => {}
                    WaitfileStatus::Unreadable(e) => {
                        tracing::debug!(
                            waitfile = %config.waitfile.display(),
                            error = %e,
                            "Waitfile not readable yet"
                        );
                    }
                }
            }
            received = shutdown.recv(), if listening => {
                listening = false;
                match received {
                    Ok(()) | Err(RecvError::Lagged(_)) => {
                        metrics::record_grace_period_started();
                        tracing::info!(
                            grace_period_secs = config.grace_period.as_secs_f64(),
                            "Shutdown requested, still waiting for plugin results"
                        );
                        let deadline = Instant::now() + config.grace_period;
                        transition(&mut state, WorkerState::GracePeriod { deadline });
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("Shutdown channel closed, no grace period will start");
                    }
                }
            }
            _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                tracing::info!("Did not receive plugin results in time. Shutting down worker.");
                transition(&mut state, WorkerState::Aborted);
                return Ok(GatherOutcome::TimedOut);
            }
        }
    }
}

/// Open the result file and hand it to the transmitter.
pub async fn handle_waitfile<T: Transmit>(
    result_file: PathBuf,
    url: &Url,
    transmitter: &T,
) -> WorkerResult<()> {
    let start_time = std::time::Instant::now();

    let artifact = match Artifact::open(result_file).await {
        Ok(artifact) => artifact,
        Err(e) => {
            metrics::record_transmission("open_failed", start_time);
            tracing::error!(error = %e, "Could not open result file");
            return Err(e);
        }
    };

    tracing::info!(
        url = %url,
        content_type = artifact.content_type().unwrap_or("unspecified"),
        bytes = artifact.len(),
        "Transmitting result file"
    );

    match transmitter.transmit(url, artifact).await {
        Ok(()) => {
            metrics::record_transmission("success", start_time);
            tracing::info!(url = %url, "Results transmitted");
            Ok(())
        }
        Err(e) => {
            metrics::record_transmission("failure", start_time);
            tracing::error!(url = %url, error = %e, "Results transmission failed");
            Err(e.into())
        }
    }
}
