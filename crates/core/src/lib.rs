//! Shared primitives for all Rust crates in Rolegate.

#![forbid(unsafe_code)]

/// Identity projections consumed by authorization.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::Principal;

/// Result type used across Rolegate crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Catalog validation reported hard errors; nothing was written.
    #[error("catalog invalid: {} error(s): {}", errors.len(), errors.join("; "))]
    CatalogInvalid {
        /// Every error reported by the validator.
        errors: Vec<String>,
    },

    /// Referenced permission is not present in synchronized storage.
    #[error("permission not found: {0}")]
    PermissionNotFound(String),

    /// Referenced role does not exist.
    #[error("role not found: {0}")]
    RoleNotFound(String),

    /// Role/permission pair is not granted.
    #[error("grant not found: {0}")]
    GrantNotFound(String),

    /// Permission dependencies form a cycle.
    #[error("dependency cycle: {}", path.join(" -> "))]
    DependencyCycle {
        /// Names along the cycle, first name repeated at the end.
        path: Vec<String>,
    },

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Operation blocked by a protection rule.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Persistent storage rejected or failed an operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
