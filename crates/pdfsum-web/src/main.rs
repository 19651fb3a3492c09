use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pdfsum_core::{Config, ModelRegistry};
use pdfsum_pdf_mupdf::MupdfBackend;
use pdfsum_web::{AppState, router};

/// PDF Summarizer web UI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to bind (overrides config and PDFSUM_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config and PDFSUM_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Hugging Face inference endpoint (overrides config and PDFSUM_INFERENCE_URL)
    #[arg(long)]
    inference_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut config = Config::load();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(url) = args.inference_url {
        config.inference.endpoint = url;
    }
    if config.inference.api_token.is_none() {
        tracing::warn!("HF_API_TOKEN is not set; the inference API may reject requests");
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("pdfsum/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = Arc::new(AppState {
        models: ModelRegistry::hugging_face(config.inference.clone(), client),
        backend: Arc::new(MupdfBackend::new()),
        config,
    });

    let app = router(state);

    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
