use clap::Parser;
use outliers_core::DetectorConfig;
use outliers_service::grpc::serve_grpc;
use outliers_service::{ServiceConfig, ServiceState};
use std::net::SocketAddr;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "outliersd", version, about = "Outlier detection gRPC service")]
struct Cli {
    /// gRPC socket address to bind, e.g. 0.0.0.0:9999
    #[arg(long, default_value = "0.0.0.0:9999", env = "OUTLIERS_LISTEN")]
    listen: SocketAddr,
    /// Standard-deviation multiple above which a value is flagged.
    #[arg(long, default_value_t = outliers_core::DEFAULT_SIGMA, env = "OUTLIERS_SIGMA")]
    sigma: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "outliers_service=info,info".to_string()),
        )
        .init();

    let cli = Cli::parse();
    anyhow::ensure!(
        cli.sigma.is_finite() && cli.sigma > 0.0,
        "--sigma must be a positive finite number, got {}",
        cli.sigma
    );

    let state = ServiceState::new(ServiceConfig {
        detector: DetectorConfig { sigma: cli.sigma },
    });

    info!("outliers-service gRPC listening on {}", cli.listen);
    serve_grpc(state, cli.listen).await
}
