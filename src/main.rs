//! Taskboard HTTP server.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use taskboard::config::{AppConfig, ConfigError, StorageMode};
use taskboard::http::{router, state::AppState};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build the database pool: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        return Err(StartupError::Io(std::io::Error::other(err.to_string())));
    }

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taskboard=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let state = build_state(&config)?;
    let address = config.bind_address();
    let listener = TcpListener::bind(address).await?;
    info!(%address, storage = ?config.storage_mode, "taskboard listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("taskboard stopped");
    Ok(())
}

fn build_state(config: &AppConfig) -> Result<AppState, StartupError> {
    match (config.storage_mode, config.database_url.as_deref()) {
        (StorageMode::Postgres, Some(url)) => {
            let pool = Pool::builder()
                .max_size(config.pool_size)
                .build(ConnectionManager::<PgConnection>::new(url))?;
            Ok(AppState::postgres(&pool))
        }
        (StorageMode::Postgres, None) => Err(ConfigError::Missing("DATABASE_URL").into()),
        (StorageMode::InMemory, _) => Ok(AppState::in_memory()),
    }
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
