use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{
    LocalizedText, PermissionAction, PermissionCatalog, PermissionCategory, PermissionDefinition,
    PermissionType, builtin_catalog,
};
use tokio::sync::Mutex;

use crate::{CatalogSyncLock, PermissionFields, PermissionRepository, StoredPermission};

use super::CatalogSyncService;

#[derive(Default)]
struct FakePermissionRepository {
    rows: Mutex<BTreeMap<String, StoredPermission>>,
    failing_names: HashSet<String>,
    writes: AtomicUsize,
}

impl FakePermissionRepository {
    fn failing(names: &[&str]) -> Self {
        Self {
            failing_names: names.iter().map(|name| (*name).to_owned()).collect(),
            ..Self::default()
        }
    }

    fn check_failure(&self, name: &str) -> AppResult<()> {
        if self.failing_names.contains(name) {
            return Err(AppError::Storage(format!(
                "constraint violation for '{name}'"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for FakePermissionRepository {
    async fn list_permissions(&self) -> AppResult<Vec<StoredPermission>> {
        Ok(self.rows.lock().await.values().cloned().collect())
    }

    async fn find_permission(&self, name: &str) -> AppResult<Option<StoredPermission>> {
        Ok(self.rows.lock().await.get(name).cloned())
    }

    async fn insert_permission(&self, name: &str, fields: &PermissionFields) -> AppResult<()> {
        self.check_failure(name)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().await.insert(
            name.to_owned(),
            StoredPermission {
                name: name.to_owned(),
                fields: fields.clone(),
                is_active: true,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn update_permission(&self, name: &str, fields: &PermissionFields) -> AppResult<()> {
        self.check_failure(name)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(row) = self.rows.lock().await.get_mut(name) {
            row.fields = fields.clone();
            row.is_active = true;
        }
        Ok(())
    }

    async fn set_permission_active(&self, name: &str, is_active: bool) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(row) = self.rows.lock().await.get_mut(name) {
            row.is_active = is_active;
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeSyncLock {
    held: AtomicBool,
}

#[async_trait]
impl CatalogSyncLock for FakeSyncLock {
    async fn try_acquire(&self) -> AppResult<bool> {
        Ok(!self.held.swap(true, Ordering::SeqCst))
    }

    async fn release(&self) -> AppResult<()> {
        self.held.store(false, Ordering::SeqCst);
        Ok(())
    }
}

fn service(repository: Arc<FakePermissionRepository>) -> CatalogSyncService {
    CatalogSyncService::new(repository, Arc::new(FakeSyncLock::default()))
}

fn text(en: &str) -> LocalizedText {
    LocalizedText::from_pairs([("tr", en), ("en", en)])
}

#[tokio::test]
async fn second_sync_of_unchanged_catalog_writes_nothing() {
    let repository = Arc::new(FakePermissionRepository::default());
    let service = service(repository.clone());
    let catalog = builtin_catalog();

    let first = service.sync(&catalog).await;
    assert!(first.is_ok());
    let first = first.unwrap_or_default();
    assert_eq!(first.created, catalog.len());
    let writes_after_first = repository.writes.load(Ordering::SeqCst);

    let second = service.sync(&catalog).await.unwrap_or_default();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 0);
    assert_eq!(second.unchanged, catalog.len());
    assert_eq!(repository.writes.load(Ordering::SeqCst), writes_after_first);
}

#[tokio::test]
async fn invalid_catalog_is_rejected_before_any_write() {
    let repository = Arc::new(FakePermissionRepository::default());
    let service = service(repository.clone());
    let catalog = PermissionCatalog::new(
        "broken",
        vec![
            PermissionDefinition::new(
                "reports.export",
                PermissionCategory::Function,
                "reports",
                PermissionAction::Read,
                PermissionType::Admin,
                text("Export"),
                text("Export reports"),
            )
            .with_dependencies(["nonexistent.permission"]),
        ],
    );

    let result = service.sync(&catalog).await;
    assert!(matches!(result, Err(AppError::CatalogInvalid { .. })));
    assert_eq!(repository.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn changed_metadata_is_refreshed_and_counted_as_updated() {
    let repository = Arc::new(FakePermissionRepository::default());
    let service = service(repository.clone());
    let synced = service.sync(&builtin_catalog()).await;
    assert!(synced.is_ok());

    if let Some(row) = repository.rows.lock().await.get_mut("users.create") {
        row.fields.resource_path = "accounts".to_owned();
    }

    let report = service.sync(&builtin_catalog()).await.unwrap_or_default();
    assert_eq!(report.updated, 1);
    assert_eq!(report.created, 0);
    let stored = repository.find_permission("users.create").await;
    assert_eq!(
        stored
            .ok()
            .flatten()
            .map(|row| row.fields.resource_path),
        Some("users".to_owned())
    );
}

#[tokio::test]
async fn per_entry_failures_do_not_abort_the_run() {
    let repository = Arc::new(FakePermissionRepository::failing(&["users.delete"]));
    let service = service(repository.clone());
    let catalog = builtin_catalog();

    let report = service.sync(&catalog).await.unwrap_or_default();
    assert!(report.has_failures());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].permission_name, "users.delete");
    assert_eq!(report.created, catalog.len() - 1);
}

#[tokio::test]
async fn sync_never_deletes_rows_missing_from_catalog() {
    let repository = Arc::new(FakePermissionRepository::default());
    let legacy = PermissionFields {
        category: PermissionCategory::Function,
        resource_path: "legacy".to_owned(),
        action: PermissionAction::Delete,
        permission_type: PermissionType::Admin,
        display_name: text("Legacy"),
        description: text("Legacy"),
    };
    let inserted = repository.insert_permission("legacy.purge", &legacy).await;
    assert!(inserted.is_ok());

    let service = service(repository.clone());
    let report = service.sync(&builtin_catalog()).await;
    assert!(report.is_ok());

    let stored = repository.find_permission("legacy.purge").await.ok().flatten();
    assert!(stored.is_some_and(|row| row.is_active));
}

#[tokio::test]
async fn stale_pass_is_dry_run_unless_applied_and_sync_reactivates() {
    let repository = Arc::new(FakePermissionRepository::default());
    let service = service(repository.clone());
    let catalog = builtin_catalog();
    assert!(service.sync(&catalog).await.is_ok());

    let legacy = PermissionFields::from_definition(
        catalog
            .find("users.delete")
            .unwrap_or_else(|| unreachable!()),
    );
    assert!(
        repository
            .insert_permission("legacy.purge", &legacy)
            .await
            .is_ok()
    );

    let dry_run = service.deactivate_stale(&catalog, false).await.unwrap_or_default();
    assert_eq!(dry_run.stale, vec!["legacy.purge".to_owned()]);
    assert_eq!(dry_run.deactivated, 0);

    let applied = service.deactivate_stale(&catalog, true).await.unwrap_or_default();
    assert_eq!(applied.deactivated, 1);
    let stored = repository.find_permission("legacy.purge").await.ok().flatten();
    assert!(stored.is_some_and(|row| !row.is_active));

    if let Some(row) = repository.rows.lock().await.get_mut("users.create") {
        row.is_active = false;
    }
    let report = service.sync(&catalog).await.unwrap_or_default();
    assert_eq!(report.updated, 1);
}

#[tokio::test]
async fn concurrent_run_is_refused_while_lock_is_held() {
    let repository = Arc::new(FakePermissionRepository::default());
    let lock = Arc::new(FakeSyncLock::default());
    let service = CatalogSyncService::new(repository, lock.clone());

    assert!(lock.try_acquire().await.unwrap_or(false));
    let result = service.sync(&builtin_catalog()).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn validator_warnings_are_reported_once() {
    let repository = Arc::new(FakePermissionRepository::default());
    let service = service(repository);
    let catalog = PermissionCatalog::new(
        "warnings",
        vec![PermissionDefinition::new(
            "reports.export",
            PermissionCategory::Function,
            "reports",
            PermissionAction::Read,
            PermissionType::Admin,
            text("Export"),
            text("Export reports"),
        )],
    );

    let report = service.sync(&catalog).await.unwrap_or_default();
    assert_eq!(report.created, 1);
    assert_eq!(
        report.warnings,
        vec![
            "permission 'reports.export': function permission has no devNotes".to_owned(),
            "permission 'reports.export': usedIn is empty".to_owned(),
        ]
    );
}
