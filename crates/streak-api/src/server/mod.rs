//! Server setup and initialization
//!
//! Wires the ports for the configured storage backend and runs the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use streak_cache::{RedisEventLog, RedisLeaderboard, RedisPool};
use streak_common::{AppConfig, AppError, AppResult, StorageBackend};
use streak_core::memory::{MemoryEventLog, MemoryLeaderboard, MemoryUserRecordRepository};
use streak_db::{create_pool, run_migrations, PgUserRecordRepository};
use streak_service::{IoPolicy, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(router);
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> AppResult<AppState> {
    let builder = ServiceContextBuilder::new()
        .policy(IoPolicy::from(&config.checkin))
        .leaderboard(config.leaderboard.clone());

    let builder = match config.storage {
        StorageBackend::Memory => {
            info!("Using in-process storage; state is lost on restart");
            let log = Arc::new(MemoryEventLog::new());
            builder
                .records(Arc::new(MemoryUserRecordRepository::new()))
                .index(Arc::new(MemoryLeaderboard::new()))
                .publisher(log.clone())
                .event_log(log)
        }
        StorageBackend::Postgres => {
            let db = config
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
            let redis = config
                .redis
                .as_ref()
                .ok_or_else(|| AppError::Config("REDIS_URL is not set".to_string()))?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&streak_db::DatabaseConfig::from(db))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            info!("Connecting to Redis...");
            let redis_pool =
                RedisPool::from_config(redis).map_err(|e| AppError::Cache(e.to_string()))?;
            redis_pool
                .health_check()
                .await
                .map_err(|e| AppError::Cache(e.to_string()))?;
            info!("Redis connection established");

            let stream = Arc::new(RedisEventLog::new(
                redis_pool.clone(),
                config.leaderboard.stream.clone(),
            ));
            let index = Arc::new(RedisLeaderboard::new(
                redis_pool,
                config.leaderboard.key.clone(),
            ));
            info!(key = index.key(), stream = stream.stream(), "Redis leaderboard ready");
            builder
                .records(Arc::new(PgUserRecordRepository::new(pool)))
                .index(index)
                .publisher(stream.clone())
                .event_log(stream)
        }
    };

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> AppResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
