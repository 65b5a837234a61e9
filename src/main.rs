//! RiyalBot - SAR→IDR market monitor
//!
//! Aggregates fiat rates, USDT/IDR spot tickers and Binance P2P listings
//! into one snapshot, serves it over HTTP and broadcasts it to Telegram
//! subscribers on a fixed interval.

use anyhow::{Context, Result};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use riyalbot_backend::{
    api,
    bot::{self, member_store::MemberStore, telegram::TelegramClient},
    engine::MarketEngine,
    models::{Config, EngineConfig},
    scrapers::REQUEST_TIMEOUT_SECS,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    info!("RiyalBot starting");

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")?;

    let engine = Arc::new(MarketEngine::new(http_client.clone(), EngineConfig::default()));

    match &config.telegram_token {
        Some(token) => {
            let store = Arc::new(
                MemberStore::new(&config.database_path).context("Failed to open member store")?,
            );
            info!(path = %config.database_path, "member store initialized");

            let tg = TelegramClient::new(http_client, token.clone());

            tokio::spawn(bot::run_update_listener(tg.clone(), store.clone()));
            tokio::spawn(bot::run_broadcast_loop(
                engine.clone(),
                tg,
                store,
                config.admin_chat_id,
            ));
            info!("telegram listener and broadcast loop started");
        }
        None => {
            warn!("TELEGRAM_BOT_TOKEN not set, broadcast disabled");
        }
    }

    let app = api::create_router(engine);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("HTTP API listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "riyalbot_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
