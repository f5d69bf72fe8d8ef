mod config;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use scribe_api::session::SessionKeys;
use scribe_api::{AppStateInner, router};
use scribe_db::Database;

use crate::config::{Cli, Command, PLACEHOLDER_SECRETS, ServeArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribe=debug,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    ensure_instance_dir(&cli.database)?;

    match cli.command {
        Some(Command::InitDb) => init_db(&cli.database),
        Some(Command::Serve) | None => serve(&cli.database, cli.serve).await,
    }
}

fn init_db(path: &Path) -> anyhow::Result<()> {
    let db = Database::open(path)?;
    db.init_schema()?;
    info!("Schema applied to {}", db.path().display());
    println!("Initialized the database.");
    Ok(())
}

async fn serve(path: &Path, args: ServeArgs) -> anyhow::Result<()> {
    if PLACEHOLDER_SECRETS.contains(&args.secret_key.as_str()) {
        warn!("SCRIBE_SECRET_KEY is a placeholder; set a real key before deploying");
    }

    let db = Database::open(path)?;
    info!("Using database {}", db.path().display());
    let sessions = SessionKeys::new(&args.secret_key, chrono::Duration::days(args.session_days));
    let app = router(Arc::new(AppStateInner { db, sessions }));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Scribe listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Create the instance folder that holds the database file.
fn ensure_instance_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create instance folder {}", dir.display()))?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, shutting down...");
    }
}
