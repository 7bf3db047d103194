use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolegate_core::AppResult;
use rolegate_domain::{Grant, Role};

/// Input payload for creating roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Badge color.
    pub color: String,
    /// Marks the role as protected.
    pub is_system_default: bool,
}

/// Grant rows written together in one storage transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGrant {
    /// Role receiving the permissions.
    pub role_name: String,
    /// Permissions to grant; existing pairs are left untouched.
    pub permission_names: Vec<String>,
    /// Provenance principal.
    pub granted_by: String,
    /// Provenance timestamp.
    pub granted_at: DateTime<Utc>,
}

/// Repository port for roles and role-permission grants.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists every role ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Finds one role by name.
    async fn find_role(&self, role_name: &str) -> AppResult<Option<Role>>;

    /// Persists a new role; fails with a conflict when the name exists.
    async fn create_role(&self, role: Role) -> AppResult<Role>;

    /// Deletes a role and its grants.
    async fn delete_role(&self, role_name: &str) -> AppResult<()>;

    /// Inserts grants atomically and returns the stored grant for every requested pair.
    ///
    /// Pairs that already exist keep their original provenance.
    async fn insert_grants(&self, grant: NewGrant) -> AppResult<Vec<Grant>>;

    /// Deletes one grant and returns whether a row existed.
    async fn delete_grant(&self, role_name: &str, permission_name: &str) -> AppResult<bool>;

    /// Lists grants for one role ordered by permission name.
    async fn list_grants(&self, role_name: &str) -> AppResult<Vec<Grant>>;

    /// Lists distinct active permission names granted to any of the roles.
    ///
    /// Role names without a stored role contribute nothing.
    async fn list_granted_permission_names(&self, role_names: &[String])
    -> AppResult<Vec<String>>;
}
