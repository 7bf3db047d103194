use async_trait::async_trait;
use rolegate_application::CatalogSyncLock;
use rolegate_core::{AppError, AppResult};
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Advisory lock key shared by every catalog sync process.
pub const CATALOG_SYNC_LOCK_KEY: i64 = 0x0052_4241_4353_594E;

/// Session-scoped PostgreSQL advisory lock for catalog sync runs.
///
/// The lock lives on one pooled connection, so that connection is held
/// until [`CatalogSyncLock::release`] unlocks it.
pub struct PostgresCatalogSyncLock {
    pool: PgPool,
    key: i64,
    held: Mutex<Option<PoolConnection<Postgres>>>,
}

impl PostgresCatalogSyncLock {
    /// Creates a lock bound to the default catalog sync key.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_key(pool, CATALOG_SYNC_LOCK_KEY)
    }

    /// Creates a lock bound to a custom advisory key.
    #[must_use]
    pub fn with_key(pool: PgPool, key: i64) -> Self {
        Self {
            pool,
            key,
            held: Mutex::new(None),
        }
    }
}

#[async_trait]
impl CatalogSyncLock for PostgresCatalogSyncLock {
    async fn try_acquire(&self) -> AppResult<bool> {
        let mut held = self.held.lock().await;
        if held.is_some() {
            return Ok(false);
        }

        let mut connection = self.pool.acquire().await.map_err(|error| {
            AppError::Storage(format!("failed to acquire sync lock connection: {error}"))
        })?;

        let acquired = sqlx::query_scalar::<_, bool>("SELECT pg_try_advisory_lock($1)")
            .bind(self.key)
            .fetch_one(&mut *connection)
            .await
            .map_err(|error| AppError::Storage(format!("failed to take sync lock: {error}")))?;

        if acquired {
            *held = Some(connection);
        } else {
            debug!(key = self.key, "catalog sync advisory lock is held elsewhere");
        }

        Ok(acquired)
    }

    async fn release(&self) -> AppResult<()> {
        let Some(mut connection) = self.held.lock().await.take() else {
            return Ok(());
        };

        let unlocked = sqlx::query_scalar::<_, bool>("SELECT pg_advisory_unlock($1)")
            .bind(self.key)
            .fetch_one(&mut *connection)
            .await;

        match unlocked {
            Ok(_) => Ok(()),
            Err(error) => {
                // Ending the session drops every advisory lock it still holds.
                if let Err(close_error) = connection.close().await {
                    warn!(
                        key = self.key,
                        error = %close_error,
                        "failed to close sync lock connection"
                    );
                }
                Err(AppError::Storage(format!(
                    "failed to release sync lock: {error}"
                )))
            }
        }
    }
}
