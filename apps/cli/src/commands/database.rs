use super::*;

pub async fn connect_and_migrate(config: &CliConfig) -> AppResult<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.require_database_url()?)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}

pub async fn migrate(config: &CliConfig) -> AppResult<ExitCode> {
    let pool = connect_and_migrate(config).await?;
    pool.close().await;

    info!("migrations applied");
    Ok(ExitCode::SUCCESS)
}
