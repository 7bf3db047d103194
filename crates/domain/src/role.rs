use chrono::{DateTime, Utc};
use rolegate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Named bundle of permission grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    name: NonEmptyString,
    display_name: String,
    color: String,
    is_system_default: bool,
    created_by: String,
}

impl Role {
    /// Creates a custom role.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        color: impl Into<String>,
        created_by: impl Into<String>,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name.into().trim())?;
        if name.as_str().chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "role name '{}' must not contain whitespace",
                name.as_str()
            )));
        }

        let display_name = display_name.into();
        let display_name = if display_name.trim().is_empty() {
            name.as_str().to_owned()
        } else {
            display_name
        };

        Ok(Self {
            name,
            display_name,
            color: color.into(),
            is_system_default: false,
            created_by: created_by.into(),
        })
    }

    /// Marks the role as a protected system default.
    #[must_use]
    pub fn into_system_default(mut self) -> Self {
        self.is_system_default = true;
        self
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the badge color.
    #[must_use]
    pub fn color(&self) -> &str {
        self.color.as_str()
    }

    /// Returns whether normal flows must not delete or strip the role.
    #[must_use]
    pub fn is_system_default(&self) -> bool {
        self.is_system_default
    }

    /// Returns the principal that created the role.
    #[must_use]
    pub fn created_by(&self) -> &str {
        self.created_by.as_str()
    }
}

/// Persisted assertion that a role carries a permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Role side of the composite identity.
    pub role_name: String,
    /// Permission side of the composite identity.
    pub permission_name: String,
    /// Principal that created the grant.
    pub granted_by: String,
    /// Creation timestamp.
    pub granted_at: DateTime<Utc>,
}
