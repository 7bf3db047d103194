use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Grant, PermissionCatalog, Role, builtin_catalog};
use tokio::sync::Mutex;

use crate::{
    CreateRoleInput, NewGrant, PermissionFields, PermissionRepository, RoleRepository,
    StoredPermission,
};

use super::RoleGrantService;

#[derive(Default)]
struct FakePermissionRepository {
    rows: BTreeMap<String, StoredPermission>,
}

impl FakePermissionRepository {
    fn synced(catalog: &PermissionCatalog) -> Self {
        let rows = catalog
            .all_permissions()
            .iter()
            .map(|definition| {
                (
                    definition.name().to_owned(),
                    StoredPermission {
                        name: definition.name().to_owned(),
                        fields: PermissionFields::from_definition(definition),
                        is_active: true,
                        updated_at: Utc::now(),
                    },
                )
            })
            .collect();
        Self { rows }
    }
}

#[async_trait]
impl PermissionRepository for FakePermissionRepository {
    async fn list_permissions(&self) -> AppResult<Vec<StoredPermission>> {
        Ok(self.rows.values().cloned().collect())
    }

    async fn find_permission(&self, name: &str) -> AppResult<Option<StoredPermission>> {
        Ok(self.rows.get(name).cloned())
    }

    async fn insert_permission(&self, _name: &str, _fields: &PermissionFields) -> AppResult<()> {
        Ok(())
    }

    async fn update_permission(&self, _name: &str, _fields: &PermissionFields) -> AppResult<()> {
        Ok(())
    }

    async fn set_permission_active(&self, _name: &str, _is_active: bool) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct FakeRoleRepository {
    roles: Mutex<BTreeMap<String, Role>>,
    grants: Mutex<BTreeMap<(String, String), Grant>>,
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.lock().await.values().cloned().collect())
    }

    async fn find_role(&self, role_name: &str) -> AppResult<Option<Role>> {
        Ok(self.roles.lock().await.get(role_name).cloned())
    }

    async fn create_role(&self, role: Role) -> AppResult<Role> {
        let mut roles = self.roles.lock().await;
        if roles.contains_key(role.name()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name()
            )));
        }
        roles.insert(role.name().to_owned(), role.clone());
        Ok(role)
    }

    async fn delete_role(&self, role_name: &str) -> AppResult<()> {
        self.roles.lock().await.remove(role_name);
        self.grants
            .lock()
            .await
            .retain(|(role, _), _| role != role_name);
        Ok(())
    }

    async fn insert_grants(&self, grant: NewGrant) -> AppResult<Vec<Grant>> {
        let mut grants = self.grants.lock().await;
        Ok(grant
            .permission_names
            .iter()
            .map(|permission_name| {
                grants
                    .entry((grant.role_name.clone(), permission_name.clone()))
                    .or_insert_with(|| Grant {
                        role_name: grant.role_name.clone(),
                        permission_name: permission_name.clone(),
                        granted_by: grant.granted_by.clone(),
                        granted_at: grant.granted_at,
                    })
                    .clone()
            })
            .collect())
    }

    async fn delete_grant(&self, role_name: &str, permission_name: &str) -> AppResult<bool> {
        Ok(self
            .grants
            .lock()
            .await
            .remove(&(role_name.to_owned(), permission_name.to_owned()))
            .is_some())
    }

    async fn list_grants(&self, role_name: &str) -> AppResult<Vec<Grant>> {
        Ok(self
            .grants
            .lock()
            .await
            .values()
            .filter(|grant| grant.role_name == role_name)
            .cloned()
            .collect())
    }

    async fn list_granted_permission_names(
        &self,
        role_names: &[String],
    ) -> AppResult<Vec<String>> {
        Ok(self
            .grants
            .lock()
            .await
            .values()
            .filter(|grant| role_names.contains(&grant.role_name))
            .map(|grant| grant.permission_name.clone())
            .collect())
    }
}

async fn service_with_roles() -> (RoleGrantService, Arc<FakeRoleRepository>) {
    let catalog = Arc::new(builtin_catalog());
    let roles = Arc::new(FakeRoleRepository::default());
    let service = RoleGrantService::new(
        catalog.clone(),
        Arc::new(FakePermissionRepository::synced(&catalog)),
        roles.clone(),
    );

    for (name, is_system_default) in [("super_admin", true), ("support", false)] {
        let created = service
            .create_role(
                "bootstrap",
                CreateRoleInput {
                    name: name.to_owned(),
                    display_name: name.to_owned(),
                    color: "#1e88e5".to_owned(),
                    is_system_default,
                },
            )
            .await;
        assert!(created.is_ok());
    }

    (service, roles)
}

#[tokio::test]
async fn grant_normalizes_dependencies_and_layout() {
    let (service, _) = service_with_roles().await;

    let grant = service.grant("support", "users.create", "alice").await;
    assert!(grant.is_ok());
    let grant = grant.unwrap_or_else(|_| unreachable!());
    assert_eq!(grant.permission_name, "users.create");
    assert_eq!(grant.granted_by, "alice");

    let granted: BTreeSet<String> = service
        .list_grants("support")
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|grant| grant.permission_name)
        .collect();
    let expected: BTreeSet<String> = ["users.create", "admin.users.view", "admin.layout"]
        .into_iter()
        .map(str::to_owned)
        .collect();
    assert_eq!(granted, expected);
}

#[tokio::test]
async fn granting_twice_is_a_no_op_success() {
    let (service, _) = service_with_roles().await;

    let first = service.grant("support", "admin.tickets.view", "alice").await;
    let second = service.grant("support", "admin.tickets.view", "bob").await;
    assert!(first.is_ok());
    assert!(second.is_ok());

    let second = second.unwrap_or_else(|_| unreachable!());
    assert_eq!(second.granted_by, "alice");
    assert_eq!(service.list_grants("support").await.unwrap_or_default().len(), 2);
}

#[tokio::test]
async fn grant_rejects_unsynchronized_permission_and_unknown_role() {
    let (service, roles) = service_with_roles().await;

    let missing_permission = service.grant("support", "users.impersonate", "alice").await;
    assert!(matches!(
        missing_permission,
        Err(AppError::PermissionNotFound(_))
    ));

    let missing_role = service.grant("auditor", "users.create", "alice").await;
    assert!(matches!(missing_role, Err(AppError::RoleNotFound(_))));
    assert!(roles.grants.lock().await.is_empty());
}

#[tokio::test]
async fn revoke_missing_pair_reports_grant_not_found() {
    let (service, _) = service_with_roles().await;

    let result = service.revoke("support", "users.delete").await;
    assert!(matches!(result, Err(AppError::GrantNotFound(_))));
}

#[tokio::test]
async fn system_default_role_keeps_its_layout_grant() {
    let (service, _) = service_with_roles().await;
    assert!(service.grant("super_admin", "users.create", "root").await.is_ok());

    let protected = service.revoke("super_admin", "admin.layout").await;
    assert!(matches!(protected, Err(AppError::Forbidden(_))));

    let allowed = service.revoke("super_admin", "users.create").await;
    assert!(allowed.is_ok());

    assert!(service.grant("support", "users.create", "root").await.is_ok());
    assert!(service.revoke("support", "admin.layout").await.is_ok());
}

#[tokio::test]
async fn missing_layout_grant_on_system_role_reports_grant_not_found() {
    let (service, _) = service_with_roles().await;

    let result = service.revoke("super_admin", "user.layout").await;
    assert!(matches!(result, Err(AppError::GrantNotFound(_))));
}

#[tokio::test]
async fn system_default_role_cannot_be_deleted() {
    let (service, _) = service_with_roles().await;

    let protected = service.delete_role("root", "super_admin").await;
    assert!(matches!(protected, Err(AppError::Forbidden(_))));

    assert!(service.grant("support", "users.create", "root").await.is_ok());
    assert!(service.delete_role("root", "support").await.is_ok());
    assert!(matches!(
        service.find_role("support").await,
        Err(AppError::RoleNotFound(_))
    ));
}

#[tokio::test]
async fn duplicate_role_name_conflicts() {
    let (service, _) = service_with_roles().await;

    let duplicate = service
        .create_role(
            "root",
            CreateRoleInput {
                name: "support".to_owned(),
                display_name: "Support".to_owned(),
                color: "#43a047".to_owned(),
                is_system_default: false,
            },
        )
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert_eq!(service.list_roles().await.unwrap_or_default().len(), 2);
}
