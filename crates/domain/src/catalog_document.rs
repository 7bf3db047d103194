//! Authored catalog documents with unchecked raw fields.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::PermissionCatalog;
use crate::permission::{
    LocalizedText, PermissionAction, PermissionCategory, PermissionDefinition, PermissionType,
};
use crate::validation::{ValidationReport, validate_catalog_with_unparsed_names};

/// Catalog as authored in a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    /// Version label of the document.
    #[serde(default)]
    pub version: Option<String>,
    /// Authored entries in catalog order.
    #[serde(default)]
    pub permissions: Vec<CatalogEntry>,
}

/// One authored permission before enum and presence checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Unique permission name.
    #[serde(default)]
    pub name: Option<String>,
    /// Category storage value.
    #[serde(default)]
    pub category: Option<String>,
    /// Logical resource identifier.
    #[serde(default)]
    pub resource_path: Option<String>,
    /// Action storage value.
    #[serde(default)]
    pub action: Option<String>,
    /// Principal population storage value.
    #[serde(default)]
    pub permission_type: Option<String>,
    /// Display name keyed by locale.
    #[serde(default)]
    pub display_name: Option<BTreeMap<String, String>>,
    /// Description keyed by locale.
    #[serde(default)]
    pub description: Option<BTreeMap<String, String>>,
    /// Dependency names.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Consumer identifiers.
    #[serde(default)]
    pub used_in: Vec<String>,
    /// Notes for catalog authors.
    #[serde(default)]
    pub dev_notes: Option<String>,
}

/// Result of turning a document into a typed catalog.
#[derive(Debug, Clone)]
pub struct ParsedCatalog {
    /// Catalog holding every entry that parsed.
    pub catalog: PermissionCatalog,
    /// Parse findings merged with the full validator report.
    pub report: ValidationReport,
}

impl CatalogDocument {
    /// Parses every entry and validates the resulting catalog in one pass.
    ///
    /// Entries with missing required fields or unknown enum values are left
    /// out of the catalog and reported as errors.
    #[must_use]
    pub fn parse(self) -> ParsedCatalog {
        let mut report = ValidationReport::default();
        let mut definitions = Vec::with_capacity(self.permissions.len());
        let mut unparsed_names = Vec::new();

        for (position, entry) in self.permissions.into_iter().enumerate() {
            let name = entry.name.clone();
            match entry.into_definition(position) {
                Ok(definition) => definitions.push(definition),
                Err(errors) => {
                    report.errors.extend(errors);
                    if let Some(name) = name.filter(|name| !name.trim().is_empty()) {
                        unparsed_names.push(name);
                    }
                }
            }
        }

        let catalog = PermissionCatalog::new(
            self.version.unwrap_or_else(|| "unversioned".to_owned()),
            definitions,
        );
        report.merge(validate_catalog_with_unparsed_names(&catalog, &unparsed_names));

        ParsedCatalog { catalog, report }
    }
}

impl CatalogEntry {
    fn into_definition(self, position: usize) -> Result<PermissionDefinition, Vec<String>> {
        let label = match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => format!("permission '{name}'"),
            _ => format!("permission #{position}"),
        };
        let mut errors = Vec::new();

        let name = required(&label, "name", self.name, &mut errors);
        let resource_path = required(&label, "resourcePath", self.resource_path, &mut errors);
        let category = required_enum::<PermissionCategory>(
            &label,
            "category",
            self.category,
            &mut errors,
        );
        let action =
            required_enum::<PermissionAction>(&label, "action", self.action, &mut errors);
        let permission_type = required_enum::<PermissionType>(
            &label,
            "permissionType",
            self.permission_type,
            &mut errors,
        );
        let display_name = required_text(&label, "displayName", self.display_name, &mut errors);
        let description = required_text(&label, "description", self.description, &mut errors);

        match (
            name,
            resource_path,
            category,
            action,
            permission_type,
            display_name,
            description,
        ) {
            (
                Some(name),
                Some(resource_path),
                Some(category),
                Some(action),
                Some(permission_type),
                Some(display_name),
                Some(description),
            ) if errors.is_empty() => {
                let mut definition = PermissionDefinition::new(
                    name,
                    category,
                    resource_path,
                    action,
                    permission_type,
                    display_name,
                    description,
                )
                .with_dependencies(self.dependencies)
                .with_used_in(self.used_in);
                if let Some(dev_notes) = self.dev_notes {
                    definition = definition.with_dev_notes(dev_notes);
                }
                Ok(definition)
            }
            _ => Err(errors),
        }
    }
}

fn required(
    label: &str,
    field: &str,
    value: Option<String>,
    errors: &mut Vec<String>,
) -> Option<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => {
            errors.push(format!("{label}: missing required field '{field}'"));
            None
        }
    }
}

fn required_enum<T: FromStr>(
    label: &str,
    field: &str,
    value: Option<String>,
    errors: &mut Vec<String>,
) -> Option<T> {
    let value = required(label, field, value, errors)?;
    match T::from_str(value.trim()) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(format!("{label}: invalid value '{value}' for field '{field}'"));
            None
        }
    }
}

fn required_text(
    label: &str,
    field: &str,
    value: Option<BTreeMap<String, String>>,
    errors: &mut Vec<String>,
) -> Option<LocalizedText> {
    let text = LocalizedText::from_pairs(value.unwrap_or_default());
    let missing = text.missing_locales();
    if missing.is_empty() {
        return Some(text);
    }

    for locale in missing {
        errors.push(format!(
            "{label}: missing required field '{field}.{locale}'"
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::CatalogDocument;

    fn parse(json: &str) -> super::ParsedCatalog {
        let document: Result<CatalogDocument, _> = serde_json::from_str(json);
        assert!(document.is_ok());
        document.unwrap_or_default().parse()
    }

    #[test]
    fn well_formed_document_parses_into_catalog() {
        let parsed = parse(
            r#"{
                "version": "7",
                "permissions": [
                    {
                        "name": "admin.layout",
                        "category": "layout",
                        "resourcePath": "admin",
                        "action": "access",
                        "permissionType": "admin",
                        "displayName": {"tr": "Yönetim", "en": "Admin"},
                        "description": {"tr": "Giriş", "en": "Entry"},
                        "usedIn": ["AdminLayout"]
                    }
                ]
            }"#,
        );

        assert!(parsed.report.is_valid(), "{:?}", parsed.report.errors);
        assert_eq!(parsed.catalog.version(), "7");
        assert!(parsed.catalog.contains("admin.layout"));
    }

    #[test]
    fn invalid_enums_and_missing_fields_are_all_reported() {
        let parsed = parse(
            r#"{
                "permissions": [
                    {
                        "name": "admin.layout",
                        "category": "panel",
                        "action": "enter",
                        "permissionType": "guest",
                        "displayName": {"en": "Admin"},
                        "description": {"tr": "Giriş", "en": "Entry"}
                    },
                    {
                        "name": "admin.dashboard.view",
                        "category": "view",
                        "resourcePath": "dashboard",
                        "action": "view",
                        "permissionType": "admin",
                        "displayName": {"tr": "Pano", "en": "Dashboard"},
                        "description": {"tr": "Pano", "en": "Dashboard"},
                        "dependencies": ["admin.layout"],
                        "usedIn": ["/admin"]
                    }
                ]
            }"#,
        );

        assert!(!parsed.report.is_valid());
        // resourcePath, category, action, permissionType, displayName.tr
        assert_eq!(parsed.report.errors.len(), 5, "{:?}", parsed.report.errors);
        assert!(
            parsed
                .report
                .errors
                .iter()
                .all(|error| !error.contains("unknown permission"))
        );
        assert_eq!(parsed.catalog.len(), 1);
    }

    #[test]
    fn duplicate_name_is_reported_when_one_copy_fails_to_parse() {
        let parsed = parse(
            r#"{
                "permissions": [
                    {
                        "name": "admin.layout",
                        "category": "layout",
                        "resourcePath": "admin",
                        "action": "access",
                        "permissionType": "admin",
                        "displayName": {"tr": "Yönetim", "en": "Admin"},
                        "description": {"tr": "Giriş", "en": "Entry"},
                        "usedIn": ["AdminLayout"]
                    },
                    {
                        "name": "admin.layout",
                        "category": "layout",
                        "resourcePath": "admin",
                        "action": "access",
                        "permissionType": "admin",
                        "displayName": {"en": "Admin"},
                        "description": {"tr": "Giriş", "en": "Entry"},
                        "usedIn": ["AdminLayout"]
                    }
                ]
            }"#,
        );

        assert_eq!(
            parsed.report.errors,
            vec![
                "permission 'admin.layout': missing required field 'displayName.tr'".to_owned(),
                "duplicate permission name 'admin.layout' declared 2 times".to_owned(),
            ]
        );
        assert_eq!(parsed.catalog.len(), 1);
    }
}
