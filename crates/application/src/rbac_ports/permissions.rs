use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolegate_core::AppResult;
use rolegate_domain::{
    LocalizedText, PermissionAction, PermissionCategory, PermissionDefinition, PermissionType,
};

/// Catalog metadata mirrored into storage and refreshed by sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionFields {
    /// Permission category.
    pub category: PermissionCategory,
    /// Logical resource identifier.
    pub resource_path: String,
    /// Permission action.
    pub action: PermissionAction,
    /// Principal population.
    pub permission_type: PermissionType,
    /// Localized display name.
    pub display_name: LocalizedText,
    /// Localized description.
    pub description: LocalizedText,
}

impl PermissionFields {
    /// Projects the storable fields of a catalog definition.
    #[must_use]
    pub fn from_definition(definition: &PermissionDefinition) -> Self {
        Self {
            category: definition.category(),
            resource_path: definition.resource_path().to_owned(),
            action: definition.action(),
            permission_type: definition.permission_type(),
            display_name: definition.display_name().clone(),
            description: definition.description().clone(),
        }
    }
}

/// Permission row as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPermission {
    /// Unique permission name.
    pub name: String,
    /// Synchronized catalog metadata.
    pub fields: PermissionFields,
    /// False once explicitly deactivated as stale.
    pub is_active: bool,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Repository port for synchronized permission rows keyed by name.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Lists every stored permission, active or not.
    async fn list_permissions(&self) -> AppResult<Vec<StoredPermission>>;

    /// Finds one stored permission by name.
    async fn find_permission(&self, name: &str) -> AppResult<Option<StoredPermission>>;

    /// Inserts a new active permission; fails with a conflict when the name exists.
    async fn insert_permission(&self, name: &str, fields: &PermissionFields) -> AppResult<()>;

    /// Overwrites the metadata of an existing permission and marks it active.
    async fn update_permission(&self, name: &str, fields: &PermissionFields) -> AppResult<()>;

    /// Sets the active flag of an existing permission.
    async fn set_permission_active(&self, name: &str, is_active: bool) -> AppResult<()>;
}
