use super::database::connect_and_migrate;
use super::*;

pub async fn create_role(
    config: &CliConfig,
    actor: String,
    name: String,
    display_name: String,
    color: String,
    is_system_default: bool,
) -> AppResult<ExitCode> {
    let catalog = Arc::new(load_valid_catalog(config)?);
    let pool = connect_and_migrate(config).await?;

    let role = role_grant_service(catalog, pool)
        .create_role(
            actor.as_str(),
            CreateRoleInput {
                name,
                display_name,
                color,
                is_system_default,
            },
        )
        .await?;

    println!("created role {}", role.name());
    Ok(ExitCode::SUCCESS)
}

pub async fn delete_role(config: &CliConfig, actor: String, name: String) -> AppResult<ExitCode> {
    let catalog = Arc::new(load_valid_catalog(config)?);
    let pool = connect_and_migrate(config).await?;

    role_grant_service(catalog, pool)
        .delete_role(actor.as_str(), name.as_str())
        .await?;

    println!("deleted role {name}");
    Ok(ExitCode::SUCCESS)
}

pub async fn list_roles(config: &CliConfig) -> AppResult<ExitCode> {
    let catalog = Arc::new(load_valid_catalog(config)?);
    let pool = connect_and_migrate(config).await?;

    for role in role_grant_service(catalog, pool).list_roles().await? {
        let marker = if role.is_system_default() {
            " (system)"
        } else {
            ""
        };
        println!(
            "{}{marker} {} {} created by {}",
            role.name(),
            role.display_name(),
            role.color(),
            role.created_by()
        );
    }

    Ok(ExitCode::SUCCESS)
}

pub async fn grant(
    config: &CliConfig,
    role: String,
    permission: String,
    actor: String,
) -> AppResult<ExitCode> {
    let catalog = Arc::new(load_valid_catalog(config)?);
    let pool = connect_and_migrate(config).await?;

    let grant = role_grant_service(catalog, pool)
        .grant(role.as_str(), permission.as_str(), actor.as_str())
        .await?;

    println!(
        "granted {} to {} (by {} at {})",
        grant.permission_name,
        grant.role_name,
        grant.granted_by,
        grant.granted_at.to_rfc3339()
    );
    Ok(ExitCode::SUCCESS)
}

pub async fn revoke(config: &CliConfig, role: String, permission: String) -> AppResult<ExitCode> {
    let catalog = Arc::new(load_valid_catalog(config)?);
    let pool = connect_and_migrate(config).await?;

    role_grant_service(catalog, pool)
        .revoke(role.as_str(), permission.as_str())
        .await?;

    println!("revoked {permission} from {role}");
    Ok(ExitCode::SUCCESS)
}

pub async fn list_grants(config: &CliConfig, role: String) -> AppResult<ExitCode> {
    let catalog = Arc::new(load_valid_catalog(config)?);
    let pool = connect_and_migrate(config).await?;

    for grant in role_grant_service(catalog, pool)
        .list_grants(role.as_str())
        .await?
    {
        println!(
            "{} (by {} at {})",
            grant.permission_name,
            grant.granted_by,
            grant.granted_at.to_rfc3339()
        );
    }

    Ok(ExitCode::SUCCESS)
}

pub async fn authorize(
    config: &CliConfig,
    roles: Vec<String>,
    permissions: Vec<String>,
    all: bool,
) -> AppResult<ExitCode> {
    let catalog = Arc::new(load_valid_catalog(config)?);
    let pool = connect_and_migrate(config).await?;
    let service = authorization_service(catalog, pool);

    let decision = match permissions.as_slice() {
        [permission] => service.authorize(&roles, permission).await,
        _ if all => service.authorize_all(&roles, &permissions).await,
        _ => service.authorize_any(&roles, &permissions).await,
    };

    if decision.is_allowed() {
        println!("allow");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("deny");
        Ok(ExitCode::from(DENIED_EXIT_CODE))
    }
}
