use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Authenticated entity projected from the identity/session provider.
///
/// Only the role names matter for authorization; the principal id is carried
/// for provenance and log correlation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    principal_id: String,
    role_names: BTreeSet<String>,
}

impl Principal {
    /// Creates a principal from a provider id and its assigned role names.
    #[must_use]
    pub fn new<I, S>(principal_id: impl Into<String>, role_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            principal_id: principal_id.into(),
            role_names: role_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the stable principal identifier.
    #[must_use]
    pub fn principal_id(&self) -> &str {
        self.principal_id.as_str()
    }

    /// Returns the role names currently assigned to the principal.
    #[must_use]
    pub fn role_names(&self) -> &BTreeSet<String> {
        &self.role_names
    }
}
