use std::sync::Arc;

use anyhow::Result;
use auth::{JwtConfig, JwtService};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;

use crate::{
    config::{AppConfig, StoreBackend},
    repositories::{MemoryStore, PgProductRepository, PgUserRepository, ProductStore, UserStore},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    let config = AppConfig::load()?;

    let (users, products): (Arc<dyn UserStore>, Arc<dyn ProductStore>) =
        match config.store.backend {
            StoreBackend::Postgres => {
                let db_config = DatabaseConfig::from_env()?;
                let pool = init_pool(&db_config).await?;

                if health_check(&pool).await? {
                    info!("Database connection successful");
                } else {
                    anyhow::bail!("Failed to connect to database");
                }
                run_migrations(&pool).await?;

                let timeout = config.store.timeout();
                (
                    Arc::new(PgUserRepository::new(pool.clone(), timeout)),
                    Arc::new(PgProductRepository::new(pool, timeout)),
                )
            }
            StoreBackend::Memory => {
                warn!("Using the in-memory store, nothing will survive a restart");
                let store = Arc::new(MemoryStore::new());
                (store.clone(), store)
            }
        };

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));
    let app_state = AppState::new(users, products, jwt_service, config.payment.clone());

    if config.store.seed_catalog {
        app_state.catalog.ensure_seeded().await?;
    }

    info!("API service initialized successfully");

    let app = routes::create_router(app_state);

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
