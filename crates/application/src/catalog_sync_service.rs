use std::sync::Arc;

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{PermissionCatalog, validate_catalog};
use tracing::warn;

use crate::{CatalogSyncLock, PermissionRepository};

mod stale;
mod sync;

#[cfg(test)]
mod tests;

/// One catalog entry that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    /// Permission name of the failed entry.
    pub permission_name: String,
    /// Storage error text.
    pub reason: String,
}

/// Aggregate outcome of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries inserted as new active permissions.
    pub created: usize,
    /// Entries whose stored metadata or active flag was refreshed.
    pub updated: usize,
    /// Entries already matching storage.
    pub unchanged: usize,
    /// Entries whose write failed.
    pub failures: Vec<SyncFailure>,
    /// Validator warnings carried for operator output.
    pub warnings: Vec<String>,
}

impl SyncReport {
    /// Returns true when at least one entry failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Outcome of a stale-permission deactivation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaleReport {
    /// Active stored permissions no longer declared in the catalog.
    pub stale: Vec<String>,
    /// Number of permissions deactivated; zero on dry runs.
    pub deactivated: usize,
    /// Entries whose deactivation failed.
    pub failures: Vec<SyncFailure>,
}

/// Application service projecting the catalog into permission storage.
#[derive(Clone)]
pub struct CatalogSyncService {
    repository: Arc<dyn PermissionRepository>,
    sync_lock: Arc<dyn CatalogSyncLock>,
}

impl CatalogSyncService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PermissionRepository>,
        sync_lock: Arc<dyn CatalogSyncLock>,
    ) -> Self {
        Self {
            repository,
            sync_lock,
        }
    }

    fn gate(catalog: &PermissionCatalog) -> AppResult<Vec<String>> {
        let report = validate_catalog(catalog);
        if !report.is_valid() {
            return Err(AppError::CatalogInvalid {
                errors: report.errors,
            });
        }

        Ok(report.warnings)
    }

    async fn acquire(&self) -> AppResult<()> {
        if self.sync_lock.try_acquire().await? {
            return Ok(());
        }

        Err(AppError::Conflict(
            "another catalog sync run is in progress".to_owned(),
        ))
    }

    async fn release(&self) {
        if let Err(error) = self.sync_lock.release().await {
            warn!(error = %error, "failed to release catalog sync lock");
        }
    }
}
