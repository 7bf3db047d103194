use std::collections::HashMap;

use tracing::{info, warn};

use crate::{PermissionFields, StoredPermission};

use super::*;

enum EntryOutcome {
    Created,
    Updated,
    Unchanged,
}

impl CatalogSyncService {
    /// Upserts every catalog entry by name without deleting anything.
    ///
    /// The catalog is validated first and nothing is written when it carries
    /// errors. Validator warnings are returned in the report, and per-entry
    /// write failures are collected while the run continues.
    pub async fn sync(&self, catalog: &PermissionCatalog) -> AppResult<SyncReport> {
        let warnings = Self::gate(catalog)?;

        self.acquire().await?;
        let result = self.sync_entries(catalog).await;
        self.release().await;

        let mut report = result?;
        report.warnings = warnings;

        info!(
            catalog_version = %catalog.version(),
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            failed = report.failures.len(),
            "catalog sync finished"
        );

        Ok(report)
    }

    async fn sync_entries(&self, catalog: &PermissionCatalog) -> AppResult<SyncReport> {
        let existing: HashMap<String, StoredPermission> = self
            .repository
            .list_permissions()
            .await?
            .into_iter()
            .map(|permission| (permission.name.clone(), permission))
            .collect();

        let mut report = SyncReport::default();
        for definition in catalog.all_permissions() {
            let desired = PermissionFields::from_definition(definition);
            match self
                .sync_entry(definition.name(), &desired, existing.get(definition.name()))
                .await
            {
                Ok(EntryOutcome::Created) => report.created += 1,
                Ok(EntryOutcome::Updated) => report.updated += 1,
                Ok(EntryOutcome::Unchanged) => report.unchanged += 1,
                Err(error) => {
                    warn!(
                        permission = %definition.name(),
                        error = %error,
                        "failed to sync catalog entry"
                    );
                    report.failures.push(SyncFailure {
                        permission_name: definition.name().to_owned(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    async fn sync_entry(
        &self,
        name: &str,
        desired: &PermissionFields,
        stored: Option<&StoredPermission>,
    ) -> AppResult<EntryOutcome> {
        match stored {
            None => {
                self.repository.insert_permission(name, desired).await?;
                Ok(EntryOutcome::Created)
            }
            Some(stored) if stored.is_active && &stored.fields == desired => {
                Ok(EntryOutcome::Unchanged)
            }
            Some(_) => {
                self.repository.update_permission(name, desired).await?;
                Ok(EntryOutcome::Updated)
            }
        }
    }
}
