//! Catalog consistency checks.
//!
//! Every check runs over the whole catalog and all findings are collected, so
//! authors can fix a broken catalog in one edit cycle.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::PermissionCatalog;
use crate::permission::{
    LAYOUT_SUFFIX, PermissionAction, PermissionCategory, PermissionDefinition, VIEW_SUFFIX,
    has_name_marker,
};

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Hard errors; any entry blocks synchronization.
    pub errors: Vec<String>,
    /// Non-blocking findings.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Returns true when no hard errors were reported.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Appends the findings of another report.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Validates a catalog.
#[must_use]
pub fn validate_catalog(catalog: &PermissionCatalog) -> ValidationReport {
    validate_catalog_with_unparsed_names(catalog, &[])
}

/// Validates a catalog together with the names of authored entries that
/// could not be parsed into it.
///
/// Unparsed names count toward duplicate detection and resolve dependency
/// references, so one pass reports every finding without repeating the
/// parse errors as dangling references.
#[must_use]
pub fn validate_catalog_with_unparsed_names(
    catalog: &PermissionCatalog,
    unparsed_names: &[String],
) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_duplicates(catalog, unparsed_names, &mut report);

    for (position, definition) in catalog.all_permissions().iter().enumerate() {
        check_required_fields(position, definition, &mut report);
        check_category_action(definition, &mut report);
        check_resource_path(definition, &mut report);
        check_authoring_notes(definition, &mut report);
    }

    // Names are fully materialized first so forward references resolve.
    let mut known_names: HashSet<&str> = catalog.names();
    known_names.extend(unparsed_names.iter().map(String::as_str));
    for definition in catalog.all_permissions() {
        for dependency in definition.dependencies() {
            if !known_names.contains(dependency.as_str()) {
                report.error(format!(
                    "permission '{}' depends on unknown permission '{dependency}'",
                    definition.name()
                ));
            }
        }
    }

    if let Some(path) = catalog.find_cycle() {
        report.error(format!("dependency cycle detected: {}", path.join(" -> ")));
    }

    report
}

fn check_duplicates(
    catalog: &PermissionCatalog,
    unparsed_names: &[String],
    report: &mut ValidationReport,
) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    let names = catalog
        .all_permissions()
        .iter()
        .map(PermissionDefinition::name)
        .chain(unparsed_names.iter().map(String::as_str));
    for name in names {
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    for name in order {
        let count = counts.get(name).copied().unwrap_or_default();
        if count > 1 && !name.trim().is_empty() {
            report.error(format!(
                "duplicate permission name '{name}' declared {count} times"
            ));
        }
    }
}

fn label(position: usize, definition: &PermissionDefinition) -> String {
    if definition.name().trim().is_empty() {
        format!("permission #{position}")
    } else {
        format!("permission '{}'", definition.name())
    }
}

fn check_required_fields(
    position: usize,
    definition: &PermissionDefinition,
    report: &mut ValidationReport,
) {
    let label = label(position, definition);

    if definition.name().trim().is_empty() {
        report.error(format!("{label}: missing required field 'name'"));
    }
    if definition.resource_path().trim().is_empty() {
        report.error(format!("{label}: missing required field 'resourcePath'"));
    }
    for locale in definition.display_name().missing_locales() {
        report.error(format!(
            "{label}: missing required field 'displayName.{locale}'"
        ));
    }
    for locale in definition.description().missing_locales() {
        report.error(format!(
            "{label}: missing required field 'description.{locale}'"
        ));
    }
}

fn check_category_action(definition: &PermissionDefinition, report: &mut ValidationReport) {
    let name = definition.name();
    if name.trim().is_empty() {
        return;
    }

    let category = definition.category().as_str();
    let action = definition.action().as_str();

    match definition.category() {
        PermissionCategory::Layout => {
            if definition.action() != PermissionAction::Access {
                report.error(format!(
                    "permission '{name}': category '{category}' requires action 'access', found '{action}'"
                ));
            }
            if !name.ends_with(LAYOUT_SUFFIX) {
                report.error(format!(
                    "permission '{name}': category '{category}' requires name suffix '{LAYOUT_SUFFIX}'"
                ));
            }
        }
        PermissionCategory::View => {
            if definition.action() != PermissionAction::View {
                report.error(format!(
                    "permission '{name}': category '{category}' requires action 'view', found '{action}'"
                ));
            }
            if !name.ends_with(VIEW_SUFFIX) {
                report.error(format!(
                    "permission '{name}': category '{category}' requires name suffix '{VIEW_SUFFIX}'"
                ));
            }
        }
        PermissionCategory::Function => {
            if definition.action() == PermissionAction::View {
                report.error(format!(
                    "permission '{name}': category '{category}' must not use action 'view'"
                ));
            }
            if has_name_marker(name, "view") || has_name_marker(name, "layout") {
                report.error(format!(
                    "permission '{name}': category '{category}' must not carry a view or layout name marker"
                ));
            }
        }
    }
}

fn check_resource_path(definition: &PermissionDefinition, report: &mut ValidationReport) {
    let resource_path = definition.resource_path();
    if resource_path
        .chars()
        .any(|character| character.is_whitespace() || character == '/' || character == '\\')
    {
        report.warning(format!(
            "permission '{}': resource path '{resource_path}' contains whitespace or a path separator",
            definition.name()
        ));
    }
}

fn check_authoring_notes(definition: &PermissionDefinition, report: &mut ValidationReport) {
    if definition.category() == PermissionCategory::Function
        && definition
            .dev_notes()
            .is_none_or(|notes| notes.trim().is_empty())
    {
        report.warning(format!(
            "permission '{}': function permission has no devNotes",
            definition.name()
        ));
    }

    if definition.used_in().is_empty() {
        report.warning(format!(
            "permission '{}': usedIn is empty",
            definition.name()
        ));
    }
}
