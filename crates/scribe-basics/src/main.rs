use std::net::SocketAddr;

use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribe_basics=debug,tower_http=debug".into()),
        )
        .init();

    let host = std::env::var("BASICS_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let port: u16 = std::env::var("BASICS_PORT")
        .unwrap_or_else(|_| "5001".into())
        .parse()?;

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Routing demo listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, scribe_basics::router()).await?;

    Ok(())
}
