use anyhow::Context;
use clap::Parser;
use engagement::{config::Config, server};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::parse();

    let client = config
        .client()
        .context("failed to build the upstream client")?;

    let addr = config.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind `{addr}`"))?;

    tracing::info!(
        %addr,
        comments = %client.comments_url(),
        reactions = %client.reactions_url(),
        "engagement gateway listening"
    );

    server::serve(listener, client, shutdown_signal())
        .await
        .context("gateway stopped unexpectedly")?;

    tracing::info!("engagement gateway shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        // Without a handler the gateway can only be killed.
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
