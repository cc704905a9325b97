//! resilient-fetch: GET a URL through the resilient invoker.
//!
//! ```text
//! CLI flags ──┐
//!             ├─▶ PolicyOverrides ─▶ RetryPolicy ─▶ Invoker ─▶ HttpFetcher ─▶ upstream
//! TOML file ──┘                                      │
//!                                                    ├─▶ TracingObserver
//!                                                    ├─▶ MetricsObserver (optional)
//!                                                    └─▶ RecordingObserver (--report)
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use resilient_invoker::config::{load_config, InvokerConfig, PolicyOverrides};
use resilient_invoker::http::HttpFetcher;
use resilient_invoker::lifecycle::{signals, Shutdown};
use resilient_invoker::observability::logging::init_logging;
use resilient_invoker::observability::{
    CompositeObserver, MetricsObserver, RecordingObserver, TracingObserver,
};
use resilient_invoker::resilience::{Invoker, SeededJitter};

#[derive(Parser)]
#[command(name = "resilient-fetch")]
#[command(about = "Fetch a URL, retrying transient failures with jittered backoff", long_about = None)]
struct Cli {
    /// Target URL.
    url: Url,

    /// TOML config file ([retry] and [observability] tables).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional attempts after the first.
    #[arg(long)]
    max_retries: Option<u32>,

    /// Initial backoff delay in milliseconds.
    #[arg(long)]
    initial_delay_ms: Option<u64>,

    /// Maximum backoff delay in milliseconds.
    #[arg(long)]
    max_delay_ms: Option<u64>,

    /// Exponential growth rate.
    #[arg(long)]
    backoff_factor: Option<f64>,

    /// Retryable HTTP status codes (comma separated).
    #[arg(long, value_delimiter = ',')]
    retry_on: Option<Vec<u16>>,

    /// Per-attempt deadline in milliseconds.
    #[arg(long)]
    attempt_timeout_ms: Option<u64>,

    /// Seed for the jitter source (reproducible delays).
    #[arg(long)]
    seed: Option<u64>,

    /// Print a JSON attempt report to stderr.
    #[arg(long)]
    report: bool,
}

impl Cli {
    fn overrides(&self) -> PolicyOverrides {
        PolicyOverrides {
            max_retries: self.max_retries,
            initial_delay_ms: self.initial_delay_ms,
            max_delay_ms: self.max_delay_ms,
            backoff_factor: self.backoff_factor,
            retryable_status_codes: self.retry_on.as_ref().map(|codes| codes.iter().copied().collect()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => InvokerConfig::default(),
    };

    if let Err(e) = init_logging(&config.observability.log_level) {
        eprintln!("logging already initialized: {}", e);
    }

    let policy = config.retry.clone().overlay(&cli.overrides()).resolve()?;
    let request_id = Uuid::new_v4().to_string();

    let span = tracing::info_span!("fetch", request_id = %request_id, url = %cli.url);

    tracing::info!(
        request_id = %request_id,
        max_retries = policy.max_retries,
        initial_delay = ?policy.initial_delay,
        max_delay = ?policy.max_delay,
        backoff_factor = policy.backoff_factor,
        "Policy resolved"
    );

    let recorder = Arc::new(RecordingObserver::new());
    let mut observer = CompositeObserver::new().with(recorder.clone());
    if config.observability.trace_attempts {
        observer = observer.with(Arc::new(TracingObserver::new(cli.url.as_str())));
    }
    if config.observability.metrics_enabled {
        observer = observer.with(Arc::new(MetricsObserver::new(cli.url.as_str())));
    }

    let shutdown = Shutdown::new();
    let _signal_task = signals::trigger_on_ctrl_c(shutdown.clone());

    let mut invoker = Invoker::new(policy)
        .with_observer(Arc::new(observer))
        .with_cancellation(shutdown.token());
    if let Some(seed) = cli.seed {
        invoker = invoker.with_jitter(SeededJitter::new(seed));
    }

    let mut fetcher = HttpFetcher::new(reqwest::Client::new()).with_request_id(request_id);
    if let Some(ms) = cli.attempt_timeout_ms {
        fetcher = fetcher.with_attempt_timeout(Duration::from_millis(ms));
    }

    let result = fetcher.get_with_retry(&cli.url, invoker).instrument(span).await;

    if cli.report {
        eprintln!("{}", serde_json::to_string_pretty(&recorder.report())?);
    }

    match result {
        Ok(response) => {
            tracing::info!(status = response.status, bytes = response.body.len(), "Fetch succeeded");
            println!("{}", response.body);
            Ok(())
        }
        Err(failure) => {
            tracing::error!(error = %failure, "Fetch failed");
            Err(failure.into())
        }
    }
}
