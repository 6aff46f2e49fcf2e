//! Quote service entry point.
//!
//! Loads configuration from an optional TOML file and the environment, initializes
//! tracing, builds the lazily connecting quote store, sets up the Axum router and
//! starts the HTTP server.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quote_service::config::{AppConfig, DEFAULT_LOG_FILTER};
use quote_service::http::start_server;
use quote_service::routes::create_router;
use quote_service::state::{AppState, Backend};
use quote_service::templates::init_templates;

/// Quote service: a random quote from a SQL store, over HTTP
#[derive(Parser, Debug)]
#[command(name = "quote-service", version, about)]
struct Args {
    /// Optional path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "quote_service=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration first so the log format can be honored
    let config = AppConfig::load(args.config.as_ref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        host = %config.http.host,
        port = config.http.port,
        selection = ?config.database.selection,
        query_timeout_secs = config.database.query_timeout_seconds,
        has_connection_string = config.connection_string.is_some(),
        "Loaded configuration"
    );

    let tera = init_templates()?;
    tracing::info!("Initialized templates");

    let backend = Backend::from_config(&config.database, config.connection_string.as_deref());

    let state = AppState::new(config.clone(), tera, backend);
    let app = create_router(state);

    start_server(app, &config).await?;

    Ok(())
}
