// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fanpage_feed::api::{self, AppState};
use fanpage_feed::config::Config;
use fanpage_feed::db::init_database;
use fanpage_feed::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,fanpage_feed=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Initialized configuration");

    // Initialize database
    let db = Arc::new(init_database(&config.database).await?);
    info!("Connected to database");

    let store = Arc::new(PgStore::new(db));
    let state = Arc::new(AppState::new(store, config.feed.clone()));

    tokio::select! {
        result = api::start_api_server(state, &config.server) => {
            if let Err(e) = result {
                error!("API server error: {}", e);
                return Err(e);
            }
        }
        signal = signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Shutdown signal received, initiating graceful shutdown"),
                Err(e) => error!("Failed to listen for shutdown signal: {}", e),
            }
        }
    }

    info!("Fan page feed shutdown complete");
    Ok(())
}
