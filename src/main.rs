use anyhow::Context;
use log::info;
use tokio::net::TcpListener;

use voiceroom::config::Config;
use voiceroom::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may carry RUST_LOG, so load it before the logger reads the environment
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("failed to load configuration")?;
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    server::serve(listener, config, shutdown_signal()).await?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl-C, shutting down");
    }
}
