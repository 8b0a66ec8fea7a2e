use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use llm_gateway::config::{load_config, GatewayConfig};
use llm_gateway::net::Server;
use llm_gateway::observability;
use llm_gateway::provider::upstream::UpstreamProvider;
use llm_gateway::provider::TextGenerationProvider;
use llm_gateway::routing::{GatewayState, Router};

#[derive(Parser)]
#[command(name = "llm-gateway")]
#[command(about = "OpenAI/Ollama-compatible gateway for a local text-generation engine", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the upstream completion endpoint.
    #[arg(long)]
    upstream_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if let Some(url) = cli.upstream_url {
        config.upstream.url = url;
    }

    observability::logging::init(&config.observability.log_level);

    tracing::info!(
        port = config.listener.port,
        model = %config.model.name,
        upstream = %config.upstream.url,
        "llm-gateway starting"
    );

    let provider: Arc<dyn TextGenerationProvider> =
        Arc::new(UpstreamProvider::new(&config.upstream));
    let router = Arc::new(Router::new(GatewayState::new(provider, &config)));

    let mut server = Server::new(&config, router);
    server.start()?;

    match server.wait_ready().await {
        Ok(addr) => tracing::info!(address = %addr, "Gateway ready"),
        Err(e) => {
            tracing::error!(error = %e, "Listener failed to start");
            return Err(e.into());
        }
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.stop().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
