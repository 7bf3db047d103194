use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolegate_application::{NewGrant, RoleRepository};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Grant, Role};
use sqlx::{FromRow, PgPool};

mod grants;


/// PostgreSQL-backed repository for roles and their grants.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    name: String,
    display_name: String,
    color: String,
    is_system_default: bool,
    created_by: String,
}

impl RoleRow {
    fn into_role(self) -> AppResult<Role> {
        let role = Role::new(self.name, self.display_name, self.color, self.created_by)
            .map_err(|error| AppError::Internal(format!("invalid stored role: {error}")))?;
        Ok(if self.is_system_default {
            role.into_system_default()
        } else {
            role
        })
    }
}

#[derive(Debug, FromRow)]
struct GrantRow {
    role_name: String,
    permission_name: String,
    granted_by: String,
    granted_at: DateTime<Utc>,
}

impl From<GrantRow> for Grant {
    fn from(row: GrantRow) -> Self {
        Self {
            role_name: row.role_name,
            permission_name: row.permission_name,
            granted_by: row.granted_by,
            granted_at: row.granted_at,
        }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, display_name, color, is_system_default, created_by
            FROM rbac_roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to list roles: {error}")))?;

        rows.into_iter().map(RoleRow::into_role).collect()
    }

    async fn find_role(&self, role_name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, display_name, color, is_system_default, created_by
            FROM rbac_roles
            WHERE name = $1
            "#,
        )
        .bind(role_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to resolve role: {error}")))?
        .map(RoleRow::into_role)
        .transpose()
    }

    async fn create_role(&self, role: Role) -> AppResult<Role> {
        sqlx::query(
            r#"
            INSERT INTO rbac_roles (name, display_name, color, is_system_default, created_by)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(role.name())
        .bind(role.display_name())
        .bind(role.color())
        .bind(role.is_system_default())
        .bind(role.created_by())
        .execute(&self.pool)
        .await
        .map_err(|error| map_role_conflict(error, role.name()))?;

        Ok(role)
    }

    async fn delete_role(&self, role_name: &str) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM rbac_roles
            WHERE name = $1
            "#,
        )
        .bind(role_name)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to delete role: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::RoleNotFound(format!(
                "role '{role_name}' was not found"
            )));
        }

        Ok(())
    }

    async fn insert_grants(&self, grant: NewGrant) -> AppResult<Vec<Grant>> {
        self.insert_grants_impl(grant).await
    }

    async fn delete_grant(&self, role_name: &str, permission_name: &str) -> AppResult<bool> {
        self.delete_grant_impl(role_name, permission_name).await
    }

    async fn list_grants(&self, role_name: &str) -> AppResult<Vec<Grant>> {
        self.list_grants_impl(role_name).await
    }

    async fn list_granted_permission_names(
        &self,
        role_names: &[String],
    ) -> AppResult<Vec<String>> {
        self.list_granted_permission_names_impl(role_names).await
    }
}

fn map_role_conflict(error: sqlx::Error, role_name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("role '{role_name}' already exists"));
    }

    AppError::Storage(format!("failed to create role: {error}"))
}
