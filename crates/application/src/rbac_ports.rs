mod catalog_source;
mod permissions;
mod roles;
mod sync_lock;

pub use catalog_source::CatalogSource;
pub use permissions::{PermissionFields, PermissionRepository, StoredPermission};
pub use roles::{CreateRoleInput, NewGrant, RoleRepository};
pub use sync_lock::CatalogSyncLock;
