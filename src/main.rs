use std::sync::Arc;

use anyhow::Context;
use investment_api::{
    config::Config,
    db::Database,
    server::{AppState, Server},
};
use tokio::sync::oneshot;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,investment_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let database = Database::connect(&config.database_url)
        .await
        .context("Failed to create DB pool")?;
    database.print_pool_stats();

    let state = Arc::new(AppState::from_pool(database.pool.clone(), &config));
    let server = Server::new(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    server.start(&config.bind_address(), shutdown_rx).await?;
    database.pool.close().await;
    Ok(())
}
