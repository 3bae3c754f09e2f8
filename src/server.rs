//! HTTP server initialization and runtime setup.
//!
//! Selects the store and cache variants once, wires them into the visit service,
//! spawns the resync worker, and runs the Axum server until shutdown.

use crate::application::resync_worker::{run_resync_worker, warm_cache};
use crate::application::services::{DevModeVisitService, VisitService, VisitUseCase};
use crate::config::Config;
use crate::domain::repositories::VisitRepository;
use crate::infrastructure::cache::{CounterCache, NullCache, RedisCounterCache};
use crate::infrastructure::persistence::{NullVisitRepository, PgVisitRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{info, warn};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Visit store (PostgreSQL with migrations, or no-op in dev mode)
/// - Counter cache (Redis, or NullCache fallback), warmed from the store
/// - Cache resync worker (when enabled)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Builds the application state, choosing between the persistent and dev mode variants.
async fn build_state(config: &Config) -> Result<AppState> {
    if config.dev_mode {
        warn!("Dev mode enabled: visits are not persisted, count reports -1");

        let store: Arc<dyn VisitRepository> = Arc::new(NullVisitRepository::new());
        let cache: Arc<dyn CounterCache> = Arc::new(NullCache::new());
        let visits = DevModeVisitService::new(VisitService::new(store.clone(), cache.clone()));

        return Ok(AppState::new(Arc::new(visits), store, cache)
            .with_behind_proxy(config.behind_proxy)
            .with_dev_mode(true));
    }

    let pool = connect_database(config).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations applied");

    let store: Arc<dyn VisitRepository> = Arc::new(
        PgVisitRepository::new(Arc::new(pool)).with_query_timeout(config.db_query_timeout()),
    );
    let cache = connect_cache(config).await;

    let service = Arc::new(VisitService::new(store.clone(), cache.clone()));
    warm_cache(&service).await;

    if let Some(interval) = config.cache_resync_interval() {
        tokio::spawn(run_resync_worker(service.clone(), interval));
    }

    let visits: Arc<dyn VisitUseCase> = service;
    Ok(AppState::new(visits, store, cache).with_behind_proxy(config.behind_proxy))
}

/// Connects the PostgreSQL pool, retrying with a fixed delay.
///
/// Makes up to `CONNECT_RETRIES` attempts, `CONNECT_RETRY_DELAY_MS` apart.
///
/// # Errors
///
/// Returns an error if no database is configured or every attempt fails.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)));

    let pool = Retry::spawn(retry_strategy(config), || {
        let options = options.clone();
        async move {
            options.connect(url).await.inspect_err(|e| {
                warn!("Failed to connect to database: {}", e);
            })
        }
    })
    .await
    .with_context(|| {
        format!(
            "Could not connect to database after {} attempts",
            config.connect_retries
        )
    })?;

    info!("Connected to database");
    Ok(pool)
}

/// Connects the counter cache, falling back to [`NullCache`].
///
/// Redis is optional: when it is not configured or every connection attempt fails,
/// the service runs with all count queries served by the store.
pub async fn connect_cache(config: &Config) -> Arc<dyn CounterCache> {
    let redis_url = match config.redis_url.as_deref() {
        Some(url) if config.is_cache_enabled() => url,
        _ => {
            info!("Cache disabled (NullCache)");
            return Arc::new(NullCache::new());
        }
    };

    let ttl_seconds = config.cache_ttl_seconds;
    let op_timeout = config.cache_timeout();

    let connected = Retry::spawn(retry_strategy(config), move || async move {
        RedisCounterCache::connect(redis_url, ttl_seconds, op_timeout)
            .await
            .inspect_err(|e| warn!("Failed to connect to Redis: {}", e))
    })
    .await;

    match connected {
        Ok(redis) => {
            info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            warn!("Redis unavailable: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

fn retry_strategy(config: &Config) -> impl Iterator<Item = Duration> {
    FixedInterval::new(config.connect_retry_delay()).take(config.connect_retries.saturating_sub(1))
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
