use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flashcards_core::{CompletionClient, Config};
use flashcards_pdf::MupdfExtractor;
use flashcards_web::{AppState, MAX_UPLOAD_BYTES};

/// PDF Flashcards - upload a PDF, get question/answer flashcards back
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Chat-completion endpoint URL
    #[arg(long)]
    api_url: Option<String>,

    /// Model identifier sent to the completion endpoint
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "flashcards_web=info,flashcards_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Resolve config from CLI flags > env vars > defaults
    let host = args
        .host
        .or_else(|| std::env::var("FLASHCARDS_HOST").ok())
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port: u16 = args
        .port
        .or_else(|| {
            std::env::var("FLASHCARDS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .unwrap_or(5000);

    let defaults = Config::default();
    let config = Config {
        api_url: args
            .api_url
            .or_else(|| std::env::var("FLASHCARDS_API_URL").ok())
            .unwrap_or(defaults.api_url.clone()),
        api_key: std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty()),
        model: args
            .model
            .or_else(|| std::env::var("FLASHCARDS_MODEL").ok())
            .unwrap_or(defaults.model.clone()),
        ..defaults
    };

    if config.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set; the completion endpoint will reject requests");
    }
    tracing::info!(api_url = %config.api_url, model = %config.model, "completion endpoint");

    let completer = CompletionClient::new(config.clone())?;
    let state = AppState::new(Arc::new(MupdfExtractor), completer, config);
    let app = flashcards_web::router(state, MAX_UPLOAD_BYTES);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
