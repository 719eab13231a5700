//! ccos-cg - Content generation service
//!
//! Generates marketing blog posts through a four-stage generative pipeline,
//! audits them for advertising compliance, stores them in SQLite and
//! publishes approved posts to WordPress.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ccos_cg::services::WordPressPublisher;
use ccos_cg::AppState;

const PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

/// Command-line arguments for ccos-cg
#[derive(Parser, Debug)]
#[command(name = "ccos-cg")]
#[command(about = "Content generation and compliance audit service")]
#[command(version)]
struct Args {
    /// Bootstrap TOML config file
    #[arg(short, long, env = "CCOS_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the database
    #[arg(short, long, env = "CCOS_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Port to listen on (overrides `[server] port`)
    #[arg(short, long, env = "CCOS_CG_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = ccos_common::config::load_toml_config(args.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=debug", toml_config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ccos-cg (Content Generation) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Gemini model: {}", toml_config.gemini.model);

    let root_folder = ccos_common::config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = ccos_common::config::prepare_root_folder(&root_folder)
        .context("Failed to initialize root folder")?;
    info!("Database: {}", db_path.display());

    let db_pool = ccos_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;
    info!("Database connection established");

    let publisher = WordPressPublisher::new(PUBLISH_TIMEOUT).context("Failed to build WordPress client")?;

    let host = toml_config.server.host.clone();
    let port = args.port.unwrap_or(toml_config.server.port);

    let state = AppState::new(db_pool, toml_config, publisher);
    let app = ccos_cg::build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
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
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
