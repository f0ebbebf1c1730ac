use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter).context("invalid RUST_LOG")?)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .context("installing tracing subscriber")?;

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    mock_server::run(listener).await.context("serving")?;
    Ok(())
}
