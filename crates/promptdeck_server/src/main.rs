//! API server entrypoint.

use promptdeck_core::DEFAULT_PORT;
use promptdeck_server::{config::Config, serve_router, AppState, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promptdeck=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Some(arg) = args.get(1) {
        if arg == "--help" {
            print_help();
            return Ok(());
        }
        anyhow::bail!("Unknown argument: '{}'. Use --help.", arg);
    }

    let config = Config::from_env();
    let store = Store::new();
    if config.seed_sample_data {
        store.seed_sample_data()?;
        tracing::info!("Seeded sample prompt, folder, and tag");
    }

    let state = AppState::new(config.clone(), store);

    let allow_public = promptdeck_server::config::env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = promptdeck_server::resolve_bind_address(&config, allow_public);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("PromptDeck API running at http://{}", actual_addr);
    tracing::info!("Data is held in memory only and is lost on shutdown");

    serve_router(listener, state, allow_public, shutdown_signal()).await?;

    Ok(())
}

fn print_help() {
    println!("PromptDeck Server\n");
    println!("Usage: promptdeck-server\n");
    println!("Environment variables:");
    println!("  PORT                 Server port (default: {})", DEFAULT_PORT);
    println!("  MAX_PROMPT_SIZE      Maximum prompt content size in bytes (default: 1MB)");
    println!("  PROMPTDECK_NO_SEED   Skip the sample prompt/folder/tag on startup");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin");
    println!(
        "  BIND                 Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
