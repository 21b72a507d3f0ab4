use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, ValueEnum};
use outliers_client::DetectClient;
use outliers_core::Metric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "outliers-client", version, about = "Demo client for the outliers Detect RPC")]
struct Cli {
    /// Server endpoint, e.g. http://127.0.0.1:9999
    #[arg(long, default_value = "http://127.0.0.1:9999", env = "OUTLIERS_TARGET")]
    target: String,
    /// Number of synthetic samples to send.
    #[arg(long, default_value_t = 1000)]
    count: usize,
    /// Spike values injected into the series, evenly spaced.
    #[arg(long, default_value_t = 3)]
    spikes: usize,
    /// RPC deadline in seconds; 0 disables the deadline.
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,
    /// Seed for the synthetic series.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct DetectReport {
    sent: usize,
    indices: Vec<i32>,
}

/// One-second CPU-load samples in a tight range, with a handful of spikes
/// far outside it so the server has something to flag.
fn synthetic_series(count: usize, spikes: usize, seed: u64) -> Vec<Metric> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = Utc::now() - ChronoDuration::seconds(count as i64);

    let mut metrics: Vec<Metric> = (0..count)
        .map(|i| {
            Metric::at(
                start + ChronoDuration::seconds(i as i64),
                "CPU",
                rng.gen_range(0.0..40.0),
            )
        })
        .collect();

    if count > 0 {
        let step = count / (spikes + 1);
        for spike in 1..=spikes {
            let position = (spike * step).min(count - 1);
            metrics[position].value = rng.gen_range(90.0..100.0);
        }
    }

    metrics
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "outliers_client=info,info".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let metrics = synthetic_series(cli.count, cli.spikes, cli.seed);
    let timeout = (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs));

    info!("sending {} metrics to {}", metrics.len(), cli.target);
    let mut client = DetectClient::connect(cli.target).await?;
    let indices = client.detect(&metrics, timeout).await?;

    match cli.format {
        OutputFormat::Text => println!("outliers at indices: {indices:?}"),
        OutputFormat::Json => {
            let report = DetectReport {
                sent: metrics.len(),
                indices,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
