use std::sync::Arc;

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{PermissionCatalog, Role};

use crate::{PermissionRepository, RoleRepository};

mod grants;
mod roles;

#[cfg(test)]
mod tests;

/// Application service managing roles and their permission grants.
#[derive(Clone)]
pub struct RoleGrantService {
    catalog: Arc<PermissionCatalog>,
    permission_repository: Arc<dyn PermissionRepository>,
    role_repository: Arc<dyn RoleRepository>,
}

impl RoleGrantService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        catalog: Arc<PermissionCatalog>,
        permission_repository: Arc<dyn PermissionRepository>,
        role_repository: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            catalog,
            permission_repository,
            role_repository,
        }
    }

    async fn require_role(&self, role_name: &str) -> AppResult<Role> {
        self.role_repository
            .find_role(role_name)
            .await?
            .ok_or_else(|| AppError::RoleNotFound(format!("role '{role_name}' was not found")))
    }
}
