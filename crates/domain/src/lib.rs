//! Domain entities and invariants for role-based access control.

#![forbid(unsafe_code)]

mod access;
mod catalog;
mod catalog_document;
mod permission;
mod role;
mod validation;

pub use access::{AccessDecision, EffectivePermissions};
pub use catalog::{
    BUILTIN_CATALOG_VERSION, PermissionCatalog, builtin_catalog, function_permissions,
    layout_permissions, view_permissions,
};
pub use catalog_document::{CatalogDocument, CatalogEntry, ParsedCatalog};
pub use permission::{
    LAYOUT_SUFFIX, LocalizedText, PermissionAction, PermissionCategory, PermissionDefinition,
    PermissionType, REQUIRED_LOCALES, VIEW_SUFFIX, has_name_marker,
};
pub use role::{Grant, Role};
pub use validation::{ValidationReport, validate_catalog, validate_catalog_with_unparsed_names};
