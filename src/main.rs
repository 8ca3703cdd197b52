//! Waitfile Worker
//!
//! Sidecar that waits for a plugin to finish and sends its results to the
//! aggregator.
//!
//! # Architecture Overview
//!
//! ```text
//!   plugin container                 worker (this process)                 aggregator
//!  ┌────────────────┐   shared    ┌──────────────────────────────┐
//!  │ writes results │   volume    │  waitfile poll (1s)          │
//!  │ then waitfile  │────────────▶│        │                     │   PUT/POST
//!  └────────────────┘             │        ▼                     │  results route
//!                                 │  open result file ──▶ upload ┼──────────────▶
//!   scheduler ── SIGTERM ────────▶│  grace period (timeout)      │
//!                                 └──────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use waitfile_worker::config::{
    load_config, resolve_config, ConfigOverrides, LogFormat, ObservabilityConfig,
};
use waitfile_worker::lifecycle::{signals, Shutdown};
use waitfile_worker::observability::{logging, metrics};
use waitfile_worker::{gather_results, GatherConfig, GatherOutcome, HttpTransmitter, WorkerError};

#[derive(Parser)]
#[command(name = "waitfile-worker", version)]
#[command(about = "Waits for a plugin's done file and sends its results to the aggregator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for the waitfile and transmit the result file it names
    Run(RunArgs),
    /// Validate a config file and print the resolved configuration
    CheckConfig {
        #[arg(short, long, env = "WAITFILE_WORKER_CONFIG")]
        config: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// TOML configuration file
    #[arg(short, long, env = "WAITFILE_WORKER_CONFIG")]
    config: Option<PathBuf>,

    /// Done file written by the plugin
    #[arg(long, env = "WAITFILE_WORKER_WAITFILE")]
    waitfile: Option<PathBuf>,

    /// Aggregator base URL or complete results URL
    #[arg(long, env = "WAITFILE_WORKER_URL")]
    url: Option<String>,

    /// Plugin name for the results route
    #[arg(long, env = "WAITFILE_WORKER_PLUGIN")]
    plugin: Option<String>,

    /// Node name for per-node plugins
    #[arg(long, env = "WAITFILE_WORKER_NODE")]
    node: Option<String>,

    /// Seconds to keep waiting for results after SIGTERM
    #[arg(long, env = "WAITFILE_WORKER_GRACE_PERIOD_SECS")]
    grace_period_secs: Option<u64>,

    /// Milliseconds between waitfile checks
    #[arg(long, env = "WAITFILE_WORKER_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "WAITFILE_WORKER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format (pretty or json)
    #[arg(long, env = "WAITFILE_WORKER_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Serve Prometheus metrics on this address
    #[arg(long, env = "WAITFILE_WORKER_METRICS_ADDRESS")]
    metrics_address: Option<String>,
}

impl RunArgs {
    fn into_parts(self) -> (Option<PathBuf>, ConfigOverrides) {
        let overrides = ConfigOverrides {
            waitfile: self.waitfile,
            poll_interval_ms: self.poll_interval_ms,
            url: self.url,
            plugin: self.plugin,
            node: self.node,
            grace_period_secs: self.grace_period_secs,
            log_level: self.log_level,
            log_format: self.log_format,
            metrics_address: self.metrics_address,
        };
        (self.config, overrides)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::CheckConfig { config } => check_config(config),
    }
}

async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (path, overrides) = args.into_parts();
    let config = match resolve_config(path.as_deref(), overrides).map_err(WorkerError::from) {
        Ok(config) => config,
        Err(e) => {
            logging::init(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "waitfile-worker starting");

    if config.observability.metrics_enabled {
        metrics::install(config.observability.metrics_address.parse()?)?;
    }

    let gather = GatherConfig::from_config(&config)?;
    tracing::info!(
        waitfile = %gather.waitfile.display(),
        url = %gather.url,
        poll_interval_ms = gather.poll_interval.as_millis() as u64,
        grace_period_secs = gather.grace_period.as_secs(),
        "Configuration loaded"
    );

    let transmitter = HttpTransmitter::from_config(&config.transmit, config.aggregator.method)?;

    let shutdown = Shutdown::new();
    let shutdown_rx = signals::listen(&shutdown);

    match gather_results(&gather, &transmitter, shutdown_rx).await {
        Ok(GatherOutcome::Transmitted { result_file }) => {
            tracing::info!(result_file = %result_file.display(), "Worker finished");
        }
        Ok(GatherOutcome::TimedOut) => {
            tracing::info!("Worker finished without results");
        }
        Err(e) => {
            tracing::error!(error = %e, "Worker failed");
            return Err(e.into());
        }
    }

    Ok(())
}

fn check_config(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&path)?;
    let gather = GatherConfig::from_config(&config)?;

    println!("# results URL: {}", gather.url);
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
