//! leadq-api - Lead Qualifier HTTP service
//!
//! Startup sequence:
//! 1. Resolve configuration (CLI / env → TOML → defaults)
//! 2. Open or create the database and ensure the schema
//! 3. Seed leads from CSV if the leads table is empty
//! 4. Build the enricher (disabled without a credential)
//! 5. Serve until Ctrl+C / SIGTERM

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use leadq_api::{build_router, enrichment, AppState};
use leadq_common::config::{load_toml_config, Overrides, ServiceConfig};
use leadq_common::db::{self, SeedOutcome, SkipReason};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for leadq-api
#[derive(Parser, Debug)]
#[command(name = "leadq-api")]
#[command(about = "Lead listing, enrichment and event ingestion service")]
#[command(version)]
struct Args {
    /// Root folder holding the database and seed file
    #[arg(short, long, env = "LEADQ_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// SQLite database path (default: <root>/app.db)
    #[arg(long, env = "LEADQ_DATABASE")]
    database: Option<PathBuf>,

    /// Lead seed CSV path (default: <root>/leads.csv)
    #[arg(long, env = "LEADQ_SEED_FILE")]
    seed_file: Option<PathBuf>,

    /// Address to listen on (default: 127.0.0.1:8000)
    #[arg(short, long, env = "LEADQ_BIND")]
    bind: Option<String>,

    /// TOML config file
    #[arg(short, long, env = "LEADQ_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml = load_toml_config(args.config.as_deref()).context("Failed to load config file")?;
    let overrides = Overrides {
        root_folder: args.root_folder,
        database_path: args.database,
        seed_file: args.seed_file,
        bind: args.bind,
    };
    let config = ServiceConfig::resolve(overrides, toml)?;

    // RUST_LOG wins over the configured level
    let level = &config.log_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("leadq_api={level},leadq_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lead Qualifier API (leadq-api) v{}", env!("CARGO_PKG_VERSION"));
    info!("Root folder: {}", config.root_folder.display());
    info!("Database path: {}", config.database_path.display());

    let pool = db::init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    match db::seed_leads_from_csv(&pool, &config.seed_file).await {
        Ok(SeedOutcome::Imported { rows }) => info!("✓ Imported {} leads from seed file", rows),
        Ok(SeedOutcome::Skipped(SkipReason::TableNotEmpty)) => {
            info!("Leads already present, seed import skipped")
        }
        Ok(SeedOutcome::Skipped(SkipReason::FileMissing)) => {
            info!("No seed file at {}, starting with no leads", config.seed_file.display())
        }
        Err(e) => {
            error!("Seed import failed: {}", e);
            return Err(e).context("Failed to import seed file");
        }
    }

    let enricher = enrichment::enricher_from_config(&config.enrichment)
        .context("Failed to create enrichment client")?;

    let state = AppState::new(pool.clone(), enricher, config.enrichment.timeout);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    info!("leadq-api listening on http://{}", config.bind);
    info!("API docs: http://{}/docs", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
