//! lexis-server - REST API server binary.

use std::net::SocketAddr;

use lexis_core::LexisConfig;
use lexis_server::{
    create_server, create_server_with_auth, seed_on_startup, spawn_event_logger, AppState,
};
use tokio::signal;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

/// Load configuration from `LEXIS_CONFIG` if set, with environment overrides.
fn load_config() -> Result<LexisConfig, Box<dyn std::error::Error>> {
    match std::env::var("LEXIS_CONFIG") {
        Ok(path) => {
            let mut config = LexisConfig::from_file(&path)?;
            config.apply_env();
            config.validate()?;
            info!(path = %path, "Loaded configuration file");
            Ok(config)
        }
        Err(_) => Ok(LexisConfig::from_env()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing, JSON lines when LEXIS_LOG_FORMAT=json
    let json_logs = std::env::var("LEXIS_LOG_FORMAT").is_ok_and(|f| f == "json");
    tracing_subscriber::registry()
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(|| fmt::layer()))
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("lexis_server=debug".parse()?),
        )
        .init();

    // Get configuration from environment
    let host = std::env::var("LEXIS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("LEXIS_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;
    let require_auth = std::env::var("LEXIS_REQUIRE_AUTH").is_ok();

    let config = load_config()?;
    let state = AppState::from_config(config)?;
    let _event_logger = spawn_event_logger(&state.events);

    // Optional bulk load at startup, never cleans
    if let Ok(seed_file) = std::env::var("LEXIS_SEED_FILE") {
        seed_on_startup(state.scheduler.store().as_ref(), &seed_file, &state.config.seed).await?;
    }

    // Create server with or without auth
    let app = if require_auth {
        match std::env::var("LEXIS_API_KEY") {
            Ok(key) if !key.is_empty() => {
                info!("Authentication enabled");
                create_server_with_auth(state.with_api_key(key))
            }
            _ => {
                warn!("LEXIS_REQUIRE_AUTH is set but LEXIS_API_KEY is empty, authentication disabled");
                create_server(state)
            }
        }
    } else {
        info!("Authentication disabled");
        create_server(state)
    };

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting lexis-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
