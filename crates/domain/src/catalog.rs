//! Immutable permission catalog and its lookups.

mod builtin;
mod closure;


use std::collections::{HashMap, HashSet};

use rolegate_core::{AppError, AppResult};

use crate::permission::{PermissionCategory, PermissionDefinition, PermissionType};

pub use builtin::{
    BUILTIN_CATALOG_VERSION, builtin_catalog, function_permissions, layout_permissions,
    view_permissions,
};

/// Authoritative list of permission definitions, loaded once and never mutated.
///
/// Lookups by name resolve to the first definition carrying that name; the
/// validator reports later duplicates.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    version: String,
    definitions: Vec<PermissionDefinition>,
    index: HashMap<String, usize>,
    dependency_graph: HashMap<String, Vec<String>>,
}

impl PermissionCatalog {
    /// Builds a catalog and precomputes its name index and dependency adjacency map.
    #[must_use]
    pub fn new(version: impl Into<String>, definitions: Vec<PermissionDefinition>) -> Self {
        let mut index = HashMap::with_capacity(definitions.len());
        let mut dependency_graph = HashMap::with_capacity(definitions.len());

        for (position, definition) in definitions.iter().enumerate() {
            if index.contains_key(definition.name()) {
                continue;
            }
            index.insert(definition.name().to_owned(), position);
            dependency_graph.insert(
                definition.name().to_owned(),
                definition.dependencies().to_vec(),
            );
        }

        Self {
            version: version.into(),
            definitions,
            index,
            dependency_graph,
        }
    }

    /// Returns the catalog version label.
    #[must_use]
    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Returns every definition in authored order.
    #[must_use]
    pub fn all_permissions(&self) -> &[PermissionDefinition] {
        self.definitions.as_slice()
    }

    /// Returns definitions in one category.
    #[must_use]
    pub fn by_category(&self, category: PermissionCategory) -> Vec<&PermissionDefinition> {
        self.definitions
            .iter()
            .filter(|definition| definition.category() == category)
            .collect()
    }

    /// Returns definitions for one principal population.
    #[must_use]
    pub fn by_type(&self, permission_type: PermissionType) -> Vec<&PermissionDefinition> {
        self.definitions
            .iter()
            .filter(|definition| definition.permission_type() == permission_type)
            .collect()
    }

    /// Returns definitions guarding one resource.
    #[must_use]
    pub fn by_resource(&self, resource_path: &str) -> Vec<&PermissionDefinition> {
        self.definitions
            .iter()
            .filter(|definition| definition.resource_path() == resource_path)
            .collect()
    }

    /// Returns the definition with the given name.
    pub fn by_name(&self, name: &str) -> AppResult<&PermissionDefinition> {
        self.find(name).ok_or_else(|| {
            AppError::PermissionNotFound(format!("permission '{name}' is not in the catalog"))
        })
    }

    /// Returns the definition with the given name, if present.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&PermissionDefinition> {
        self.index
            .get(name)
            .and_then(|position| self.definitions.get(*position))
    }

    /// Returns whether the catalog declares `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the set of declared names.
    #[must_use]
    pub fn names(&self) -> HashSet<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    /// Returns the direct dependencies declared for `name`.
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.dependency_graph
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the first layout permission for a principal population.
    #[must_use]
    pub fn layout_for(&self, permission_type: PermissionType) -> Option<&PermissionDefinition> {
        self.definitions.iter().find(|definition| {
            definition.category() == PermissionCategory::Layout
                && definition.permission_type() == permission_type
        })
    }

    /// Returns the number of definitions, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns whether the catalog has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
