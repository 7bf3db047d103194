use super::*;

impl PostgresRoleRepository {
    pub(super) async fn insert_grants_impl(&self, grant: NewGrant) -> AppResult<Vec<Grant>> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Storage(format!("failed to begin transaction: {error}"))
            })?;

        let mut stored = Vec::with_capacity(grant.permission_names.len());
        for permission_name in &grant.permission_names {
            sqlx::query(
                r#"
                INSERT INTO rbac_role_permissions (role_name, permission_name, granted_by, granted_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (role_name, permission_name) DO NOTHING
                "#,
            )
            .bind(grant.role_name.as_str())
            .bind(permission_name.as_str())
            .bind(grant.granted_by.as_str())
            .bind(grant.granted_at)
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_grant_reference(error, grant.role_name.as_str(), permission_name))?;

            let row = sqlx::query_as::<_, GrantRow>(
                r#"
                SELECT role_name, permission_name, granted_by, granted_at
                FROM rbac_role_permissions
                WHERE role_name = $1 AND permission_name = $2
                "#,
            )
            .bind(grant.role_name.as_str())
            .bind(permission_name.as_str())
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| AppError::Storage(format!("failed to load grant: {error}")))?;

            stored.push(Grant::from(row));
        }

        transaction.commit().await.map_err(|error| {
            AppError::Storage(format!("failed to commit transaction: {error}"))
        })?;

        Ok(stored)
    }

    pub(super) async fn delete_grant_impl(
        &self,
        role_name: &str,
        permission_name: &str,
    ) -> AppResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM rbac_role_permissions
            WHERE role_name = $1 AND permission_name = $2
            "#,
        )
        .bind(role_name)
        .bind(permission_name)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to revoke grant: {error}")))?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    pub(super) async fn list_grants_impl(&self, role_name: &str) -> AppResult<Vec<Grant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT role_name, permission_name, granted_by, granted_at
            FROM rbac_role_permissions
            WHERE role_name = $1
            ORDER BY permission_name
            "#,
        )
        .bind(role_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to list grants: {error}")))?;

        Ok(rows.into_iter().map(Grant::from).collect())
    }

    pub(super) async fn list_granted_permission_names_impl(
        &self,
        role_names: &[String],
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT grants.permission_name
            FROM rbac_role_permissions AS grants
            INNER JOIN rbac_roles AS roles
                ON roles.name = grants.role_name
            INNER JOIN rbac_permissions AS permissions
                ON permissions.name = grants.permission_name
            WHERE grants.role_name = ANY($1)
                AND permissions.is_active
            "#,
        )
        .bind(role_names)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to load granted permissions: {error}")))
    }
}

fn map_grant_reference(error: sqlx::Error, role_name: &str, permission_name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return match database_error.constraint() {
            Some(constraint) if constraint.contains("role_name") => {
                AppError::RoleNotFound(format!("role '{role_name}' was not found"))
            }
            _ => AppError::PermissionNotFound(format!(
                "permission '{permission_name}' was not found"
            )),
        };
    }

    AppError::Storage(format!("failed to persist grant: {error}"))
}
