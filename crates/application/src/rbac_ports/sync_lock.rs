use async_trait::async_trait;
use rolegate_core::AppResult;

/// Single-writer coordination port for catalog sync runs.
#[async_trait]
pub trait CatalogSyncLock: Send + Sync {
    /// Attempts to take the lock and returns false when another run holds it.
    async fn try_acquire(&self) -> AppResult<bool>;

    /// Releases a lock taken by this process.
    async fn release(&self) -> AppResult<()>;
}
