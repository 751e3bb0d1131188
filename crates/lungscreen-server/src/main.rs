//! LungScreen Server
//!
//! Serves lung cancer risk predictions over HTTP from models loaded at
//! startup.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

use lungscreen_server::{create_router, AppState, Overrides, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "lungscreen-server")]
#[command(about = "LungScreen lung cancer risk screening API", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LUNGSCREEN_CONFIG", default_value = "config.yaml")]
    config: PathBuf,

    /// Models config file, replacing the inline registry
    #[arg(short, long, env = "LUNGSCREEN_MODELS")]
    models_config: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            listen: self.listen.clone(),
            port: self.port,
            models_config: self.models_config.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting LungScreen server");

    let config = ServerConfig::load(&cli.config, &cli.overrides())?;
    info!("Configuration loaded from {}", cli.config.display());

    let metrics_handle = init_metrics()?;

    // Every model is loaded up front; any failure aborts startup
    let state = AppState::new(config, metrics_handle)?;

    let addr: SocketAddr = state.config.bind_address().parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("lungscreen=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lungscreen=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "lungscreen_predictions_total",
        "Total number of verdicts by model and label"
    );
    metrics::describe_counter!(
        "lungscreen_prediction_errors_total",
        "Total number of failed predictions by error kind"
    );
    metrics::describe_histogram!(
        "lungscreen_inference_latency_us",
        metrics::Unit::Microseconds,
        "Encoding plus model evaluation latency in microseconds by model"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
