use chrono::Utc;
use rolegate_domain::{Grant, PermissionCategory};
use tracing::info;

use crate::NewGrant;

use super::*;

impl RoleGrantService {
    /// Grants a permission to a role.
    ///
    /// The permission's catalog dependencies and the layout permission of its
    /// principal population are granted alongside it with the same provenance.
    /// Granting an existing pair succeeds without changing it.
    pub async fn grant(
        &self,
        role_name: &str,
        permission_name: &str,
        granted_by: &str,
    ) -> AppResult<Grant> {
        self.require_role(role_name).await?;
        self.require_active_permission(permission_name).await?;

        let mut permission_names = vec![permission_name.to_owned()];
        for implied in self.implied_permissions(permission_name)? {
            self.require_active_permission(implied.as_str()).await?;
            permission_names.push(implied);
        }

        let grants = self
            .role_repository
            .insert_grants(NewGrant {
                role_name: role_name.to_owned(),
                permission_names,
                granted_by: granted_by.to_owned(),
                granted_at: Utc::now(),
            })
            .await?;

        info!(
            role = %role_name,
            permission = %permission_name,
            granted_by = %granted_by,
            implied = grants.len().saturating_sub(1),
            "permission granted"
        );

        grants
            .into_iter()
            .find(|grant| grant.permission_name == permission_name)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "grant '{role_name}:{permission_name}' missing after insert"
                ))
            })
    }

    /// Revokes a permission from a role.
    ///
    /// Layout permissions of system default roles are protected.
    pub async fn revoke(&self, role_name: &str, permission_name: &str) -> AppResult<()> {
        let role = self.require_role(role_name).await?;

        let is_layout = self
            .catalog
            .find(permission_name)
            .is_some_and(|definition| definition.category() == PermissionCategory::Layout);
        if role.is_system_default() && is_layout {
            let is_granted = self
                .role_repository
                .list_grants(role_name)
                .await?
                .iter()
                .any(|grant| grant.permission_name == permission_name);
            if !is_granted {
                return Err(grant_not_found(role_name, permission_name));
            }

            return Err(AppError::Forbidden(format!(
                "layout permission '{permission_name}' is protected on system default role '{role_name}'"
            )));
        }

        if !self
            .role_repository
            .delete_grant(role_name, permission_name)
            .await?
        {
            return Err(grant_not_found(role_name, permission_name));
        }

        info!(role = %role_name, permission = %permission_name, "permission revoked");
        Ok(())
    }

    /// Lists grants held directly by a role.
    pub async fn list_grants(&self, role_name: &str) -> AppResult<Vec<Grant>> {
        self.require_role(role_name).await?;
        self.role_repository.list_grants(role_name).await
    }

    async fn require_active_permission(&self, permission_name: &str) -> AppResult<()> {
        match self
            .permission_repository
            .find_permission(permission_name)
            .await?
        {
            Some(permission) if permission.is_active => Ok(()),
            _ => Err(AppError::PermissionNotFound(format!(
                "permission '{permission_name}' is not synchronized"
            ))),
        }
    }

    fn implied_permissions(&self, permission_name: &str) -> AppResult<Vec<String>> {
        let Some(definition) = self.catalog.find(permission_name) else {
            return Ok(Vec::new());
        };

        let mut closure = self.catalog.dependency_closure([permission_name])?;
        closure.remove(permission_name);

        let has_layout = closure.iter().any(|name| {
            self.catalog
                .find(name)
                .is_some_and(|dependency| dependency.category() == PermissionCategory::Layout)
        });
        if definition.category() != PermissionCategory::Layout
            && !has_layout
            && let Some(layout) = self.catalog.layout_for(definition.permission_type())
        {
            closure.insert(layout.name().to_owned());
        }

        Ok(closure.into_iter().collect())
    }
}

fn grant_not_found(role_name: &str, permission_name: &str) -> AppError {
    AppError::GrantNotFound(format!(
        "grant '{role_name}:{permission_name}' was not found"
    ))
}
