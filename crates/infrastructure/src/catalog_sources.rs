use std::path::{Path, PathBuf};

use rolegate_application::CatalogSource;
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{CatalogDocument, ParsedCatalog, builtin_catalog, validate_catalog};

/// Catalog compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalogSource;

impl CatalogSource for BuiltinCatalogSource {
    fn load(&self) -> AppResult<ParsedCatalog> {
        let catalog = builtin_catalog();
        let report = validate_catalog(&catalog);
        Ok(ParsedCatalog { catalog, report })
    }

    fn describe(&self) -> String {
        "built-in catalog".to_owned()
    }
}

/// Catalog authored as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileCatalogSource {
    path: PathBuf,
}

impl JsonFileCatalogSource {
    /// Creates a source reading the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the configured file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

impl CatalogSource for JsonFileCatalogSource {
    fn load(&self) -> AppResult<ParsedCatalog> {
        let content = std::fs::read_to_string(&self.path).map_err(|error| {
            AppError::Validation(format!(
                "failed to read catalog file '{}': {error}",
                self.path.display()
            ))
        })?;

        let document: CatalogDocument = serde_json::from_str(content.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "catalog file '{}' is not a valid catalog document: {error}",
                self.path.display()
            ))
        })?;

        Ok(document.parse())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rolegate_application::CatalogSource;
    use rolegate_core::AppError;

    use super::{BuiltinCatalogSource, JsonFileCatalogSource};

    fn scratch_file(label: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "rolegate-{label}-{}.json",
            std::process::id()
        ));
        assert!(std::fs::write(&path, content).is_ok());
        path
    }

    #[test]
    fn builtin_source_loads_a_valid_catalog() {
        let parsed = BuiltinCatalogSource.load();
        assert!(parsed.is_ok());
        let parsed = parsed.unwrap_or_else(|_| unreachable!());
        assert!(parsed.report.is_valid(), "{:?}", parsed.report.errors);
        assert!(!parsed.catalog.is_empty());
    }

    #[test]
    fn json_file_with_dangling_dependency_reports_it() {
        let path = scratch_file(
            "dangling",
            r#"{
                "version": "test",
                "permissions": [
                    {
                        "name": "reports.export",
                        "category": "function",
                        "resourcePath": "reports",
                        "action": "read",
                        "permissionType": "admin",
                        "displayName": {"tr": "Dışa aktar", "en": "Export"},
                        "description": {"tr": "Rapor", "en": "Reports"},
                        "dependencies": ["nonexistent.permission"],
                        "usedIn": ["ReportsPage"],
                        "devNotes": "export button"
                    }
                ]
            }"#,
        );

        let parsed = JsonFileCatalogSource::new(&path).load();
        let _ = std::fs::remove_file(&path);

        let parsed = parsed.unwrap_or_else(|_| unreachable!());
        assert_eq!(parsed.report.errors.len(), 1, "{:?}", parsed.report.errors);
        assert!(parsed.report.errors[0].contains("nonexistent.permission"));
    }

    #[test]
    fn unreadable_or_malformed_files_are_validation_errors() {
        let missing = JsonFileCatalogSource::new("/nonexistent/rolegate/catalog.json").load();
        assert!(matches!(missing, Err(AppError::Validation(_))));

        let path = scratch_file("malformed", "{ not json");
        let malformed = JsonFileCatalogSource::new(&path).load();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(malformed, Err(AppError::Validation(_))));
    }
}
