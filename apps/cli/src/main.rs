//! Rolegate operator command line.

#![forbid(unsafe_code)]

mod cli_config;
mod commands;

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use rolegate_domain::PermissionCategory;
use tracing::error;

use crate::cli_config::{CliConfig, init_tracing};

#[derive(Parser)]
#[command(name = "rolegate")]
#[command(about = "Permission catalog and role grant tooling", long_about = None)]
struct Cli {
    /// JSON catalog file (defaults to CATALOG_PATH, then the built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the catalog and print errors and warnings
    ValidateCatalog,

    /// Validate the catalog and upsert it into storage
    SyncCatalog,

    /// Print the catalog grouped by category
    ListCatalog {
        /// Only list one category (layout, view, function)
        #[arg(long, value_parser = parse_category)]
        category: Option<PermissionCategory>,
    },

    /// Report stored permissions missing from the catalog
    PruneCatalog {
        /// Deactivate the reported permissions instead of only listing them
        #[arg(long)]
        apply: bool,
    },

    /// Run database migrations and exit
    Migrate,

    /// Create a role
    CreateRole {
        /// Unique role name
        #[arg(long)]
        name: String,

        /// Human-readable name
        #[arg(long, default_value = "")]
        display_name: String,

        /// Badge color
        #[arg(long, default_value = "#607d8b")]
        color: String,

        /// Protect the role from deletion and layout revocation
        #[arg(long)]
        system_default: bool,

        /// Principal recorded as creator
        #[arg(long, default_value = "cli")]
        actor: String,
    },

    /// Delete a custom role and its grants
    DeleteRole {
        /// Role name
        #[arg(long)]
        name: String,

        /// Principal performing the deletion
        #[arg(long, default_value = "cli")]
        actor: String,
    },

    /// List roles
    ListRoles,

    /// Grant a permission (and what it implies) to a role
    Grant {
        /// Role name
        #[arg(long)]
        role: String,

        /// Permission name
        #[arg(long)]
        permission: String,

        /// Principal recorded as grantor
        #[arg(long, default_value = "cli")]
        actor: String,
    },

    /// Revoke a single permission from a role
    Revoke {
        /// Role name
        #[arg(long)]
        role: String,

        /// Permission name
        #[arg(long)]
        permission: String,
    },

    /// List grants held by a role
    ListGrants {
        /// Role name
        #[arg(long)]
        role: String,
    },

    /// Answer a guard decision for a set of roles
    Authorize {
        /// Role names held by the principal
        #[arg(long = "role", required = true)]
        roles: Vec<String>,

        /// Required permission names
        #[arg(long = "permission", required = true)]
        permissions: Vec<String>,

        /// Require every listed permission instead of any one
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = match CliConfig::load(cli.catalog) {
        Ok(config) => config,
        Err(error) => {
            error!(error = %error, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::ValidateCatalog => commands::validate_catalog(&config),
        Command::SyncCatalog => commands::sync_catalog(&config).await,
        Command::ListCatalog { category } => commands::list_catalog(&config, category),
        Command::PruneCatalog { apply } => commands::prune_catalog(&config, apply).await,
        Command::Migrate => commands::migrate(&config).await,
        Command::CreateRole {
            name,
            display_name,
            color,
            system_default,
            actor,
        } => {
            commands::create_role(&config, actor, name, display_name, color, system_default).await
        }
        Command::DeleteRole { name, actor } => commands::delete_role(&config, actor, name).await,
        Command::ListRoles => commands::list_roles(&config).await,
        Command::Grant {
            role,
            permission,
            actor,
        } => commands::grant(&config, role, permission, actor).await,
        Command::Revoke { role, permission } => {
            commands::revoke(&config, role, permission).await
        }
        Command::ListGrants { role } => commands::list_grants(&config, role).await,
        Command::Authorize {
            roles,
            permissions,
            all,
        } => commands::authorize(&config, roles, permissions, all).await,
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(error) => {
            error!(error = %error, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn parse_category(value: &str) -> Result<PermissionCategory, String> {
    PermissionCategory::from_str(value).map_err(|error| error.to_string())
}
