//! Course recommendation web service
//!
//! Serves a course selection form and, for a submitted course, the six most
//! similar courses according to a precomputed similarity matrix. The model
//! artifacts are downloaded into a local cache on first start and loaded once.

mod config;
mod html;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use course_model::{ArtifactStore, CourseModel};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "course-recommender")]
#[command(about = "Recommends similar courses from a precomputed similarity matrix")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 5000, env = "PORT")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "BIND_ADDR")]
    bind: String,

    /// Path to the JSON config file
    #[arg(long, default_value = "course-recommender.json", env = "COURSE_CONFIG")]
    config: PathBuf,

    /// Artifact cache directory (overrides the config file and environment default)
    #[arg(long, env = "COURSE_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
}

/// Shared application state
pub struct AppState {
    pub model: CourseModel,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "course_recommender=info,course_model=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let cache_dir = config.cache_dir(cli.cache_dir.as_deref());
    tracing::info!("Artifact cache: {}", cache_dir.display());

    let store = ArtifactStore::new(cache_dir, config.artifacts.clone(), config.format)
        .context("Failed to set up artifact store")?;

    // Fetch failures are logged here and surface as a load error below
    store.ensure_all().await;
    let model = store
        .load()
        .context("Failed to load the recommendation model")?;

    let state = Arc::new(AppState { model });
    let app = routes::router(state);

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;
    tracing::info!("Starting course-recommender on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Course recommender shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
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
