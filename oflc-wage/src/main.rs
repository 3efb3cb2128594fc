//! oflc-wage - prevailing wage lookup service
//!
//! Startup order: config, logging, store, optional rebuild, HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use oflc_common::config::{self, TomlConfig, DATABASE_FILE_NAME};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use oflc_wage::{build_router, AppState, DataSources, WageStore};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "oflc-wage")]
#[command(about = "OFLC prevailing wage lookup service")]
#[command(version)]
struct Args {
    /// HTTP port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// HTTP bind address
    #[arg(long, env = "OFLC_HOST")]
    host: Option<String>,

    /// Path to the SQLite reference store
    #[arg(short, long, env = "OFLC_DATABASE")]
    database: Option<PathBuf>,

    /// Directory holding ALC_Export.csv, Geography.csv and oes_soc_occs.csv
    #[arg(long, env = "OFLC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, env = "OFLC_CONFIG")]
    config: Option<PathBuf>,

    /// Rebuild the store from the data directory before serving
    #[arg(long)]
    reinit: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first: it carries the default log level
    let toml_config = config::load_toml_config(args.config.as_deref())
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting oflc-wage v{}", env!("CARGO_PKG_VERSION"));
    match config::config_file_path(args.config.as_deref()) {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No config file found, using built-in defaults"),
    }

    let data_dir = config::resolve_path(
        args.data_dir.as_deref(),
        toml_config.data_dir.as_deref(),
        config::default_data_dir,
    );
    let db_path = config::resolve_path(
        args.database.as_deref(),
        toml_config.database_path.as_deref(),
        || data_dir.join(DATABASE_FILE_NAME),
    );
    info!("Data directory: {}", data_dir.display());
    info!("Database path: {}", db_path.display());

    let sources = DataSources::from_dir(&data_dir);
    let store = WageStore::open(&db_path).await;

    initialize_store(&store, &sources, &toml_config, args.reinit).await;

    let state = AppState::new(store.clone(), sources, toml_config.query_timeout());
    let app = build_router(state);

    let host = args.host.unwrap_or_else(|| toml_config.host.clone());
    let port = args.port.unwrap_or(toml_config.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("oflc-wage listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    store.close().await;
    info!("oflc-wage stopped");
    Ok(())
}

/// Build the store at startup when asked to, or when it is missing and `auto_init`
/// is on
///
/// A failed build is logged and the service keeps running; searches answer 503
/// until a rebuild succeeds.
async fn initialize_store(
    store: &WageStore,
    sources: &DataSources,
    toml_config: &TomlConfig,
    reinit: bool,
) {
    let initialized = store.is_initialized().await;
    if initialized && !reinit {
        return;
    }
    if !initialized && !reinit && !toml_config.auto_init {
        warn!("Reference store not initialized; POST /api/init-db to build it");
        return;
    }

    info!("Building reference store from CSV sources");
    match store.rebuild(sources).await {
        Ok(counts) => info!(
            "✓ Reference store ready: wage_data={}, geography={}, occupations={}",
            counts.wage_data, counts.geography, counts.occupations
        ),
        Err(e) => error!("Initial store build failed: {}", e),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
