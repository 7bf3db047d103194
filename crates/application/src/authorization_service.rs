use std::sync::Arc;

use rolegate_core::{AppError, AppResult, Principal};
use rolegate_domain::{AccessDecision, EffectivePermissions, PermissionCatalog};
use tracing::{debug, error, warn};

use crate::RoleRepository;


/// Resolves effective permissions and answers guard decisions.
///
/// Stateless over the immutable catalog and a grants snapshot read per call;
/// safe to share across tasks.
#[derive(Clone)]
pub struct AuthorizationService {
    catalog: Arc<PermissionCatalog>,
    role_repository: Arc<dyn RoleRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(catalog: Arc<PermissionCatalog>, role_repository: Arc<dyn RoleRepository>) -> Self {
        Self {
            catalog,
            role_repository,
        }
    }

    /// Returns the union of the roles' grants closed over catalog dependencies.
    ///
    /// Unknown roles contribute nothing. Granted names that are no longer in
    /// the catalog are dropped.
    pub async fn effective_permissions(
        &self,
        role_names: &[String],
    ) -> AppResult<EffectivePermissions> {
        if role_names.is_empty() {
            return Ok(EffectivePermissions::default());
        }

        let granted = self
            .role_repository
            .list_granted_permission_names(role_names)
            .await?;

        let (known, unknown): (Vec<String>, Vec<String>) = granted
            .into_iter()
            .partition(|name| self.catalog.contains(name));
        if !unknown.is_empty() {
            debug!(
                roles = ?role_names,
                dropped = ?unknown,
                "ignoring granted permissions missing from the catalog"
            );
        }

        match self.catalog.dependency_closure(known) {
            Ok(closure) => Ok(EffectivePermissions::new(closure)),
            Err(AppError::DependencyCycle { path }) => {
                error!(
                    cycle = %path.join(" -> "),
                    "permission catalog contains a dependency cycle"
                );
                Err(AppError::DependencyCycle { path })
            }
            Err(other) => Err(other),
        }
    }

    /// Returns the cached permission projection for a session principal.
    pub async fn resolve_principal(&self, principal: &Principal) -> AppResult<EffectivePermissions> {
        let role_names: Vec<String> = principal.role_names().iter().cloned().collect();
        self.effective_permissions(role_names.as_slice()).await
    }

    /// Decides whether the roles carry `permission_name`.
    ///
    /// Never fails: any resolution fault is logged and denied.
    pub async fn authorize(&self, role_names: &[String], permission_name: &str) -> AccessDecision {
        self.decide(role_names, permission_name, |permissions| {
            permissions.has_permission(permission_name)
        })
        .await
    }

    /// Decides whether the roles carry at least one of `permission_names`.
    ///
    /// An empty requirement list is denied.
    pub async fn authorize_any(
        &self,
        role_names: &[String],
        permission_names: &[String],
    ) -> AccessDecision {
        if permission_names.is_empty() {
            return Self::deny_empty_requirement(role_names, "any");
        }

        let label = permission_names.join("|");
        self.decide(role_names, label.as_str(), |permissions| {
            permissions.has_any(permission_names)
        })
        .await
    }

    /// Decides whether the roles carry every one of `permission_names`.
    ///
    /// An empty requirement list is denied.
    pub async fn authorize_all(
        &self,
        role_names: &[String],
        permission_names: &[String],
    ) -> AccessDecision {
        if permission_names.is_empty() {
            return Self::deny_empty_requirement(role_names, "all");
        }

        let label = permission_names.join("&");
        self.decide(role_names, label.as_str(), |permissions| {
            permissions.has_all(permission_names)
        })
        .await
    }

    fn deny_empty_requirement(role_names: &[String], combinator: &str) -> AccessDecision {
        warn!(
            roles = ?role_names,
            combinator = %combinator,
            "authorization requirement lists no permissions, denying"
        );
        AccessDecision::Deny
    }

    async fn decide<F>(&self, role_names: &[String], requirement: &str, check: F) -> AccessDecision
    where
        F: FnOnce(&EffectivePermissions) -> bool,
    {
        match self.effective_permissions(role_names).await {
            Ok(permissions) => AccessDecision::from_allowed(check(&permissions)),
            Err(error) => {
                warn!(
                    roles = ?role_names,
                    requirement = %requirement,
                    error = %error,
                    "authorization fault, denying"
                );
                AccessDecision::Deny
            }
        }
    }
}
