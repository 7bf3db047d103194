use tracing::{info, warn};

use super::*;

impl CatalogSyncService {
    /// Finds active stored permissions missing from the catalog and, when
    /// `apply` is set, marks them inactive.
    ///
    /// Rows are never deleted; grants on deactivated permissions stop
    /// contributing to effective permission sets.
    pub async fn deactivate_stale(
        &self,
        catalog: &PermissionCatalog,
        apply: bool,
    ) -> AppResult<StaleReport> {
        Self::gate(catalog)?;

        self.acquire().await?;
        let result = self.deactivate_entries(catalog, apply).await;
        self.release().await;

        let report = result?;
        info!(
            stale = report.stale.len(),
            deactivated = report.deactivated,
            failed = report.failures.len(),
            apply,
            "stale permission pass finished"
        );

        Ok(report)
    }

    async fn deactivate_entries(
        &self,
        catalog: &PermissionCatalog,
        apply: bool,
    ) -> AppResult<StaleReport> {
        let mut stale: Vec<String> = self
            .repository
            .list_permissions()
            .await?
            .into_iter()
            .filter(|permission| permission.is_active && !catalog.contains(&permission.name))
            .map(|permission| permission.name)
            .collect();
        stale.sort();

        let mut report = StaleReport::default();
        if apply {
            for name in &stale {
                match self.repository.set_permission_active(name, false).await {
                    Ok(()) => report.deactivated += 1,
                    Err(error) => {
                        warn!(
                            permission = %name,
                            error = %error,
                            "failed to deactivate stale permission"
                        );
                        report.failures.push(SyncFailure {
                            permission_name: name.clone(),
                            reason: error.to_string(),
                        });
                    }
                }
            }
        }
        report.stale = stale;

        Ok(report)
    }
}
