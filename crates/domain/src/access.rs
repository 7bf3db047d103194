use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// Flattened permission set of a principal, closed over dependencies.
///
/// Membership checks are constant time; this is the projection cached on a
/// session after role resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermissions(HashSet<String>);

impl EffectivePermissions {
    /// Wraps an already closed set of permission names.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Returns whether `permission_name` is in the set.
    #[must_use]
    pub fn has_permission(&self, permission_name: &str) -> bool {
        self.0.contains(permission_name)
    }

    /// Returns whether at least one of `permission_names` is in the set.
    #[must_use]
    pub fn has_any<I, S>(&self, permission_names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        permission_names
            .into_iter()
            .any(|name| self.has_permission(name.as_ref()))
    }

    /// Returns whether every one of `permission_names` is in the set.
    ///
    /// An empty requirement list is satisfied.
    #[must_use]
    pub fn has_all<I, S>(&self, permission_names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        permission_names
            .into_iter()
            .all(|name| self.has_permission(name.as_ref()))
    }

    /// Returns the names in sorted order.
    #[must_use]
    pub fn sorted(&self) -> BTreeSet<&str> {
        self.0.iter().map(String::as_str).collect()
    }

    /// Returns the number of permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no permission is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Boolean outcome handed to page and route guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// The guarded action may proceed.
    Allow,
    /// The guarded action must be refused.
    Deny,
}

impl AccessDecision {
    /// Converts a membership result into a decision.
    #[must_use]
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }

    /// Returns true for [`AccessDecision::Allow`].
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}
