use std::sync::Arc;

use chrono::Utc;
use rolegate_application::{
    AuthorizationService, CatalogSyncLock, CatalogSyncService, CreateRoleInput, NewGrant,
    PermissionRepository, RoleGrantService, RoleRepository,
};
use rolegate_core::AppError;
use rolegate_domain::{Role, builtin_catalog};

use super::InMemoryRbacRepository;

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[tokio::test]
async fn synced_catalog_drives_grants_and_guards() {
    let repository = Arc::new(InMemoryRbacRepository::new());
    let catalog = Arc::new(builtin_catalog());

    let sync = CatalogSyncService::new(repository.clone(), repository.clone());
    let report = sync.sync(&catalog).await;
    assert!(report.is_ok());
    assert_eq!(report.unwrap_or_default().created, catalog.len());

    let grants = RoleGrantService::new(catalog.clone(), repository.clone(), repository.clone());
    let created = grants
        .create_role(
            "bootstrap",
            CreateRoleInput {
                name: "support".to_owned(),
                display_name: "Support".to_owned(),
                color: "#43a047".to_owned(),
                is_system_default: false,
            },
        )
        .await;
    assert!(created.is_ok());
    assert!(grants.grant("support", "users.create", "alice").await.is_ok());

    let authorization = AuthorizationService::new(catalog, repository.clone());
    let roles = names(&["support"]);
    assert!(
        authorization
            .authorize(&roles, "admin.users.view")
            .await
            .is_allowed()
    );
    assert!(
        !authorization
            .authorize(&roles, "users.delete")
            .await
            .is_allowed()
    );

    assert!(repository.set_permission_active("users.create", false).await.is_ok());
    assert!(
        !authorization
            .authorize(&roles, "users.create")
            .await
            .is_allowed()
    );
}

#[tokio::test]
async fn grant_batch_is_all_or_nothing() {
    let repository = InMemoryRbacRepository::new();
    let role = Role::new("support", "Support", "#43a047", "bootstrap");
    assert!(repository.create_role(role.unwrap_or_else(|_| unreachable!())).await.is_ok());

    let result = repository
        .insert_grants(NewGrant {
            role_name: "support".to_owned(),
            permission_names: names(&["users.create"]),
            granted_by: "alice".to_owned(),
            granted_at: Utc::now(),
        })
        .await;

    assert!(matches!(result, Err(AppError::PermissionNotFound(_))));
    assert!(repository.list_grants("support").await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn deleting_a_role_removes_its_grants() {
    let repository = Arc::new(InMemoryRbacRepository::new());
    let sync = CatalogSyncService::new(repository.clone(), repository.clone());
    assert!(sync.sync(&builtin_catalog()).await.is_ok());

    let role = Role::new("support", "Support", "#43a047", "bootstrap");
    assert!(repository.create_role(role.unwrap_or_else(|_| unreachable!())).await.is_ok());
    let inserted = repository
        .insert_grants(NewGrant {
            role_name: "support".to_owned(),
            permission_names: names(&["admin.layout"]),
            granted_by: "alice".to_owned(),
            granted_at: Utc::now(),
        })
        .await;
    assert!(inserted.is_ok());

    assert!(repository.delete_role("support").await.is_ok());
    assert!(
        repository
            .list_granted_permission_names(&names(&["support"]))
            .await
            .unwrap_or_default()
            .is_empty()
    );
    assert!(matches!(
        repository.delete_role("support").await,
        Err(AppError::RoleNotFound(_))
    ));
}

#[tokio::test]
async fn sync_lock_is_exclusive_until_released() {
    let repository = InMemoryRbacRepository::new();

    assert!(repository.try_acquire().await.unwrap_or(false));
    assert!(!repository.try_acquire().await.unwrap_or(true));
    assert!(repository.release().await.is_ok());
    assert!(repository.try_acquire().await.unwrap_or(false));
}
