//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod catalog_sync_service;
mod rbac_ports;
mod role_grant_service;

pub use authorization_service::AuthorizationService;
pub use catalog_sync_service::{CatalogSyncService, StaleReport, SyncFailure, SyncReport};
pub use rbac_ports::{
    CatalogSource, CatalogSyncLock, CreateRoleInput, NewGrant, PermissionFields,
    PermissionRepository, RoleRepository, StoredPermission,
};
pub use role_grant_service::RoleGrantService;
