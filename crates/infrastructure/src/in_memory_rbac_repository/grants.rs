use std::collections::BTreeSet;

use super::*;

impl InMemoryRbacRepository {
    pub(super) async fn insert_grants_impl(&self, grant: NewGrant) -> AppResult<Vec<Grant>> {
        let roles = self.roles.read().await;
        let permissions = self.permissions.read().await;
        let mut grants = self.grants.write().await;

        if !roles.contains_key(grant.role_name.as_str()) {
            return Err(AppError::RoleNotFound(format!(
                "role '{}' was not found",
                grant.role_name
            )));
        }

        if let Some(missing) = grant
            .permission_names
            .iter()
            .find(|permission_name| !permissions.contains_key(permission_name.as_str()))
        {
            return Err(AppError::PermissionNotFound(format!(
                "permission '{missing}' was not found"
            )));
        }

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

    pub(super) async fn list_granted_permission_names_impl(
        &self,
        role_names: &[String],
    ) -> AppResult<Vec<String>> {
        let roles = self.roles.read().await;
        let permissions = self.permissions.read().await;
        let grants = self.grants.read().await;

        let names: BTreeSet<String> = grants
            .values()
            .filter(|grant| {
                roles.contains_key(grant.role_name.as_str())
                    && role_names.contains(&grant.role_name)
            })
            .filter(|grant| {
                permissions
                    .get(grant.permission_name.as_str())
                    .is_some_and(|permission| permission.is_active)
            })
            .map(|grant| grant.permission_name.clone())
            .collect();

        Ok(names.into_iter().collect())
    }
}
