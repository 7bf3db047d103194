use std::collections::BTreeMap;
use std::str::FromStr;

use rolegate_core::AppError;
use serde::{Deserialize, Serialize};

/// Name suffix carried by every layout permission.
pub const LAYOUT_SUFFIX: &str = ".layout";

/// Name suffix carried by every view permission.
pub const VIEW_SUFFIX: &str = ".view";

/// Locales every localized text must provide.
pub const REQUIRED_LOCALES: [&str; 2] = ["tr", "en"];

/// Coarse grouping of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    /// Panel entry gate.
    Layout,
    /// Read access to one page.
    View,
    /// Mutating or fine-grained operation.
    Function,
}

impl PermissionCategory {
    /// Returns a stable storage value for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::View => "view",
            Self::Function => "function",
        }
    }

    /// Returns all categories in catalog group order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionCategory] = &[
            PermissionCategory::Layout,
            PermissionCategory::View,
            PermissionCategory::Function,
        ];

        ALL
    }
}

impl FromStr for PermissionCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "layout" => Ok(Self::Layout),
            "view" => Ok(Self::View),
            "function" => Ok(Self::Function),
            _ => Err(AppError::Validation(format!(
                "unknown permission category '{value}'"
            ))),
        }
    }
}

/// Operation a permission allows on its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// Enter a panel.
    Access,
    /// Open a page.
    View,
    /// Create resources.
    Create,
    /// Read resource details.
    Read,
    /// Update resources.
    Update,
    /// Delete resources.
    Delete,
    /// Full management of a resource.
    Manage,
}

impl PermissionAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::View => "view",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Manage => "manage",
        }
    }
}

impl FromStr for PermissionAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "access" => Ok(Self::Access),
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "manage" => Ok(Self::Manage),
            _ => Err(AppError::Validation(format!(
                "unknown permission action '{value}'"
            ))),
        }
    }
}

/// Principal population a permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionType {
    /// Back-office administrators.
    Admin,
    /// Customer-facing users.
    User,
}

impl PermissionType {
    /// Returns a stable storage value for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl FromStr for PermissionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(AppError::Validation(format!(
                "unknown permission type '{value}'"
            ))),
        }
    }
}

/// Text keyed by locale code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    /// Creates localized text from `(locale, text)` pairs.
    #[must_use]
    pub fn from_pairs<I, L, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(locale, text)| (locale.into(), text.into()))
                .collect(),
        )
    }

    /// Returns the text for one locale.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Returns required locales that are absent or blank.
    #[must_use]
    pub fn missing_locales(&self) -> Vec<&'static str> {
        REQUIRED_LOCALES
            .iter()
            .copied()
            .filter(|locale| self.get(locale).is_none_or(|text| text.trim().is_empty()))
            .collect()
    }

    /// Returns the English text, falling back to any available locale.
    #[must_use]
    pub fn preferred(&self) -> &str {
        self.get("en")
            .or_else(|| self.0.values().next().map(String::as_str))
            .unwrap_or_default()
    }

    /// Returns the underlying locale map.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// One authored permission in the catalog.
///
/// Construction does not enforce catalog invariants; the validator reports
/// them so that every violation surfaces in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDefinition {
    name: String,
    category: PermissionCategory,
    resource_path: String,
    action: PermissionAction,
    permission_type: PermissionType,
    display_name: LocalizedText,
    description: LocalizedText,
    dependencies: Vec<String>,
    used_in: Vec<String>,
    dev_notes: Option<String>,
}

impl PermissionDefinition {
    /// Creates a permission definition without dependencies or usage notes.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: PermissionCategory,
        resource_path: impl Into<String>,
        action: PermissionAction,
        permission_type: PermissionType,
        display_name: LocalizedText,
        description: LocalizedText,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            resource_path: resource_path.into(),
            action,
            permission_type,
            display_name,
            description,
            dependencies: Vec::new(),
            used_in: Vec::new(),
            dev_notes: None,
        }
    }

    /// Sets the dependency names, dropping repeated entries while keeping order.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.clear();
        for dependency in dependencies {
            let dependency = dependency.into();
            if !self.dependencies.contains(&dependency) {
                self.dependencies.push(dependency);
            }
        }
        self
    }

    /// Sets the consumer identifiers that reference this permission.
    #[must_use]
    pub fn with_used_in<I, S>(mut self, used_in: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.used_in = used_in.into_iter().map(Into::into).collect();
        self
    }

    /// Sets implementation notes for catalog authors.
    #[must_use]
    pub fn with_dev_notes(mut self, dev_notes: impl Into<String>) -> Self {
        self.dev_notes = Some(dev_notes.into());
        self
    }

    /// Returns the unique permission name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the permission category.
    #[must_use]
    pub fn category(&self) -> PermissionCategory {
        self.category
    }

    /// Returns the logical resource identifier.
    #[must_use]
    pub fn resource_path(&self) -> &str {
        self.resource_path.as_str()
    }

    /// Returns the permission action.
    #[must_use]
    pub fn action(&self) -> PermissionAction {
        self.action
    }

    /// Returns the principal population.
    #[must_use]
    pub fn permission_type(&self) -> PermissionType {
        self.permission_type
    }

    /// Returns the localized display name.
    #[must_use]
    pub fn display_name(&self) -> &LocalizedText {
        &self.display_name
    }

    /// Returns the localized description.
    #[must_use]
    pub fn description(&self) -> &LocalizedText {
        &self.description
    }

    /// Returns declared dependency names in authored order.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        self.dependencies.as_slice()
    }

    /// Returns consumer identifiers.
    #[must_use]
    pub fn used_in(&self) -> &[String] {
        self.used_in.as_slice()
    }

    /// Returns implementation notes, if any.
    #[must_use]
    pub fn dev_notes(&self) -> Option<&str> {
        self.dev_notes.as_deref()
    }
}

/// Returns whether a dot-separated name has `marker` as one of its segments.
#[must_use]
pub fn has_name_marker(name: &str, marker: &str) -> bool {
    name.split('.').any(|segment| segment == marker)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{
        LocalizedText, PermissionAction, PermissionCategory, PermissionType, has_name_marker,
    };

    #[test]
    fn action_roundtrip_storage_value() {
        let restored = PermissionAction::from_str(PermissionAction::Manage.as_str());
        assert!(matches!(restored, Ok(PermissionAction::Manage)));
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        assert!(PermissionCategory::from_str("page").is_err());
        assert!(PermissionAction::from_str("publish").is_err());
        assert!(PermissionType::from_str("guest").is_err());
    }

    #[test]
    fn missing_locales_reports_blank_and_absent_entries() {
        let text = LocalizedText::from_pairs([("en", "Users"), ("tr", "  ")]);
        assert_eq!(text.missing_locales(), vec!["tr"]);

        let text = LocalizedText::from_pairs([("de", "Benutzer")]);
        assert_eq!(text.missing_locales(), vec!["tr", "en"]);
    }

    #[test]
    fn name_markers_match_whole_segments() {
        assert!(has_name_marker("admin.dashboard.view", "view"));
        assert!(!has_name_marker("admin.preview.update", "view"));
    }
}
