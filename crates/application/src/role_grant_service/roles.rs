use tracing::info;

use crate::CreateRoleInput;

use super::*;

impl RoleGrantService {
    /// Creates a role.
    pub async fn create_role(&self, actor: &str, input: CreateRoleInput) -> AppResult<Role> {
        let role = Role::new(input.name, input.display_name, input.color, actor)?;
        let role = if input.is_system_default {
            role.into_system_default()
        } else {
            role
        };

        let role = self.role_repository.create_role(role).await?;
        info!(
            role = %role.name(),
            actor = %actor,
            system_default = role.is_system_default(),
            "role created"
        );

        Ok(role)
    }

    /// Lists every role.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.role_repository.list_roles().await
    }

    /// Returns one role by name.
    pub async fn find_role(&self, role_name: &str) -> AppResult<Role> {
        self.require_role(role_name).await
    }

    /// Deletes a custom role together with its grants.
    pub async fn delete_role(&self, actor: &str, role_name: &str) -> AppResult<()> {
        let role = self.require_role(role_name).await?;
        if role.is_system_default() {
            return Err(AppError::Forbidden(format!(
                "role '{role_name}' is a system default and cannot be deleted"
            )));
        }

        self.role_repository.delete_role(role_name).await?;
        info!(role = %role_name, actor = %actor, "role deleted");

        Ok(())
    }
}
