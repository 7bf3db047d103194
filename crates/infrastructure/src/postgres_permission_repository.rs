use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolegate_application::{PermissionFields, PermissionRepository, StoredPermission};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{LocalizedText, PermissionAction, PermissionCategory, PermissionType};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};


/// PostgreSQL-backed repository for synchronized permission rows.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    name: String,
    category: String,
    resource_path: String,
    action: String,
    permission_type: String,
    display_name: Json<LocalizedText>,
    description: Json<LocalizedText>,
    is_active: bool,
    updated_at: DateTime<Utc>,
}

impl PermissionRow {
    fn into_stored(self) -> AppResult<StoredPermission> {
        let decode = |field: &str, error: AppError| {
            AppError::Internal(format!(
                "invalid stored {field} for permission '{}': {error}",
                self.name
            ))
        };

        let fields = PermissionFields {
            category: PermissionCategory::from_str(self.category.as_str())
                .map_err(|error| decode("category", error))?,
            resource_path: self.resource_path.clone(),
            action: PermissionAction::from_str(self.action.as_str())
                .map_err(|error| decode("action", error))?,
            permission_type: PermissionType::from_str(self.permission_type.as_str())
                .map_err(|error| decode("permission_type", error))?,
            display_name: self.display_name.0.clone(),
            description: self.description.0.clone(),
        };

        Ok(StoredPermission {
            name: self.name,
            fields,
            is_active: self.is_active,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_PERMISSIONS: &str = r#"
    SELECT
        name,
        category,
        resource_path,
        action,
        permission_type,
        display_name,
        description,
        is_active,
        updated_at
    FROM rbac_permissions
"#;

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn list_permissions(&self) -> AppResult<Vec<StoredPermission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            format!("{SELECT_PERMISSIONS} ORDER BY name").as_str(),
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(PermissionRow::into_stored).collect()
    }

    async fn find_permission(&self, name: &str) -> AppResult<Option<StoredPermission>> {
        sqlx::query_as::<_, PermissionRow>(
            format!("{SELECT_PERMISSIONS} WHERE name = $1").as_str(),
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!("failed to load permission '{name}': {error}"))
        })?
        .map(PermissionRow::into_stored)
        .transpose()
    }

    async fn insert_permission(&self, name: &str, fields: &PermissionFields) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rbac_permissions (
                name,
                category,
                resource_path,
                action,
                permission_type,
                display_name,
                description,
                is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, true)
            "#,
        )
        .bind(name)
        .bind(fields.category.as_str())
        .bind(fields.resource_path.as_str())
        .bind(fields.action.as_str())
        .bind(fields.permission_type.as_str())
        .bind(Json(&fields.display_name))
        .bind(Json(&fields.description))
        .execute(&self.pool)
        .await
        .map_err(|error| map_permission_conflict(error, name))?;

        Ok(())
    }

    async fn update_permission(&self, name: &str, fields: &PermissionFields) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE rbac_permissions
            SET category = $2,
                resource_path = $3,
                action = $4,
                permission_type = $5,
                display_name = $6,
                description = $7,
                is_active = true,
                updated_at = NOW()
            WHERE name = $1
            "#,
        )
        .bind(name)
        .bind(fields.category.as_str())
        .bind(fields.resource_path.as_str())
        .bind(fields.action.as_str())
        .bind(fields.permission_type.as_str())
        .bind(Json(&fields.display_name))
        .bind(Json(&fields.description))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!("failed to update permission '{name}': {error}"))
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::PermissionNotFound(format!(
                "permission '{name}' was not found"
            )));
        }

        Ok(())
    }

    async fn set_permission_active(&self, name: &str, is_active: bool) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE rbac_permissions
            SET is_active = $2,
                updated_at = NOW()
            WHERE name = $1
            "#,
        )
        .bind(name)
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!(
                "failed to change active flag of permission '{name}': {error}"
            ))
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::PermissionNotFound(format!(
                "permission '{name}' was not found"
            )));
        }

        Ok(())
    }
}

fn map_permission_conflict(error: sqlx::Error, name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("permission '{name}' already exists"));
    }

    AppError::Storage(format!("failed to insert permission '{name}': {error}"))
}
