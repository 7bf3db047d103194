use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rolegate_application::{
    CatalogSyncLock, NewGrant, PermissionFields, PermissionRepository, RoleRepository,
    StoredPermission,
};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Grant, Role};
use tokio::sync::RwLock;

mod grants;

#[cfg(test)]
mod tests;

/// In-memory permission, role and grant store with a process-local sync lock.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    permissions: RwLock<BTreeMap<String, StoredPermission>>,
    roles: RwLock<BTreeMap<String, Role>>,
    grants: RwLock<BTreeMap<(String, String), Grant>>,
    sync_locked: AtomicBool,
}

impl InMemoryRbacRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionRepository for InMemoryRbacRepository {
    async fn list_permissions(&self) -> AppResult<Vec<StoredPermission>> {
        Ok(self.permissions.read().await.values().cloned().collect())
    }

    async fn find_permission(&self, name: &str) -> AppResult<Option<StoredPermission>> {
        Ok(self.permissions.read().await.get(name).cloned())
    }

    async fn insert_permission(&self, name: &str, fields: &PermissionFields) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        if permissions.contains_key(name) {
            return Err(AppError::Conflict(format!(
                "permission '{name}' already exists"
            )));
        }

        permissions.insert(
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
        let mut permissions = self.permissions.write().await;
        let stored = permissions.get_mut(name).ok_or_else(|| {
            AppError::PermissionNotFound(format!("permission '{name}' was not found"))
        })?;

        stored.fields = fields.clone();
        stored.is_active = true;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn set_permission_active(&self, name: &str, is_active: bool) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        let stored = permissions.get_mut(name).ok_or_else(|| {
            AppError::PermissionNotFound(format!("permission '{name}' was not found"))
        })?;

        stored.is_active = is_active;
        stored.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.read().await.values().cloned().collect())
    }

    async fn find_role(&self, role_name: &str) -> AppResult<Option<Role>> {
        Ok(self.roles.read().await.get(role_name).cloned())
    }

    async fn create_role(&self, role: Role) -> AppResult<Role> {
        let mut roles = self.roles.write().await;
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
        let mut roles = self.roles.write().await;
        if roles.remove(role_name).is_none() {
            return Err(AppError::RoleNotFound(format!(
                "role '{role_name}' was not found"
            )));
        }

        self.grants
            .write()
            .await
            .retain(|(stored_role, _), _| stored_role != role_name);
        Ok(())
    }

    async fn insert_grants(&self, grant: NewGrant) -> AppResult<Vec<Grant>> {
        self.insert_grants_impl(grant).await
    }

    async fn delete_grant(&self, role_name: &str, permission_name: &str) -> AppResult<bool> {
        Ok(self
            .grants
            .write()
            .await
            .remove(&(role_name.to_owned(), permission_name.to_owned()))
            .is_some())
    }

    async fn list_grants(&self, role_name: &str) -> AppResult<Vec<Grant>> {
        Ok(self
            .grants
            .read()
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
        self.list_granted_permission_names_impl(role_names).await
    }
}

#[async_trait]
impl CatalogSyncLock for InMemoryRbacRepository {
    async fn try_acquire(&self) -> AppResult<bool> {
        Ok(!self.sync_locked.swap(true, Ordering::SeqCst))
    }

    async fn release(&self) -> AppResult<()> {
        self.sync_locked.store(false, Ordering::SeqCst);
        Ok(())
    }
}
