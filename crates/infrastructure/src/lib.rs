//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod catalog_sources;
mod in_memory_rbac_repository;
mod postgres_catalog_sync_lock;
mod postgres_permission_repository;
mod postgres_role_repository;

pub use catalog_sources::{BuiltinCatalogSource, JsonFileCatalogSource};
pub use in_memory_rbac_repository::InMemoryRbacRepository;
pub use postgres_catalog_sync_lock::{CATALOG_SYNC_LOCK_KEY, PostgresCatalogSyncLock};
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_role_repository::PostgresRoleRepository;
