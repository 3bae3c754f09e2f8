//! PostgreSQL implementation of the visit repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::Visit;
use crate::domain::repositories::VisitRepository;
use crate::error::{StoreError, StoreOp};

/// Default upper bound for a single store query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// PostgreSQL repository for the append-only `visits` table.
///
/// Inserts and counts are plain statements; PostgreSQL provides the concurrency
/// safety. Each query is bounded by `query_timeout` on top of the pool's acquire timeout.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
    query_timeout: Duration,
}

impl PgVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Overrides the per-query timeout (`DB_QUERY_TIMEOUT_MS`).
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    async fn bounded<T, F>(&self, op: StoreOp, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(|e| StoreError::from_sqlx(e, op)),
            Err(_) => Err(StoreError::Unavailable(format!(
                "query timed out after {:?}",
                self.query_timeout
            ))),
        }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn create(&self, ip_address: &str) -> Result<(), StoreError> {
        self.bounded(
            StoreOp::Write,
            sqlx::query("INSERT INTO visits (ip_address) VALUES ($1)")
                .bind(ip_address)
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        self.bounded(
            StoreOp::Read,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM visits")
                .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Visit>, StoreError> {
        let rows = self
            .bounded(
                StoreOp::Read,
                sqlx::query_as::<_, (i64, String, DateTime<Utc>)>(
                    r#"
                    SELECT id, ip_address, created_at
                    FROM visits
                    ORDER BY id DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(self.pool.as_ref()),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, ip_address, created_at)| Visit::new(id, ip_address, created_at))
            .collect())
    }

    async fn health_check(&self) -> bool {
        self.bounded(
            StoreOp::Read,
            sqlx::query("SELECT 1").execute(self.pool.as_ref()),
        )
        .await
        .is_ok()
    }
}
