use std::process::ExitCode;
use std::sync::Arc;

use rolegate_application::{
    AuthorizationService, CatalogSyncService, CreateRoleInput, RoleGrantService,
};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{ParsedCatalog, PermissionCatalog, PermissionCategory};
use rolegate_infrastructure::{
    PostgresCatalogSyncLock, PostgresPermissionRepository, PostgresRoleRepository,
};
use sqlx::PgPool;
use tracing::info;

use crate::cli_config::CliConfig;

mod catalog;
mod database;
mod roles;


pub use catalog::{list_catalog, prune_catalog, sync_catalog, validate_catalog};
pub use database::migrate;
pub use roles::{authorize, create_role, delete_role, grant, list_grants, list_roles, revoke};

/// Exit code reported when a guard decision denies.
const DENIED_EXIT_CODE: u8 = 2;

fn load_catalog(config: &CliConfig) -> AppResult<ParsedCatalog> {
    let source = config.catalog_source();
    info!(source = %source.describe(), "loading permission catalog");
    source.load()
}

fn load_valid_catalog(config: &CliConfig) -> AppResult<PermissionCatalog> {
    let parsed = load_catalog(config)?;
    if !parsed.report.is_valid() {
        return Err(AppError::CatalogInvalid {
            errors: parsed.report.errors,
        });
    }

    Ok(parsed.catalog)
}

fn catalog_sync_service(pool: PgPool) -> CatalogSyncService {
    CatalogSyncService::new(
        Arc::new(PostgresPermissionRepository::new(pool.clone())),
        Arc::new(PostgresCatalogSyncLock::new(pool)),
    )
}

fn role_grant_service(catalog: Arc<PermissionCatalog>, pool: PgPool) -> RoleGrantService {
    RoleGrantService::new(
        catalog,
        Arc::new(PostgresPermissionRepository::new(pool.clone())),
        Arc::new(PostgresRoleRepository::new(pool)),
    )
}

fn authorization_service(catalog: Arc<PermissionCatalog>, pool: PgPool) -> AuthorizationService {
    AuthorizationService::new(catalog, Arc::new(PostgresRoleRepository::new(pool)))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn category_heading(category: PermissionCategory, count: usize) -> String {
    format!("{} ({count})", category.as_str())
}
