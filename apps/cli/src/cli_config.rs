use std::env;
use std::path::PathBuf;

use rolegate_application::CatalogSource;
use rolegate_core::{AppError, AppResult};
use rolegate_infrastructure::{BuiltinCatalogSource, JsonFileCatalogSource};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub database_url: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub max_connections: u32,
}

impl CliConfig {
    /// Reads the environment; `catalog_override` wins over `CATALOG_PATH`.
    pub fn load(catalog_override: Option<PathBuf>) -> AppResult<Self> {
        let database_url = optional_env("DATABASE_URL");
        let catalog_path = catalog_override.or_else(|| optional_env("CATALOG_PATH").map(PathBuf::from));
        let max_connections = match optional_env("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.parse::<u32>().map_err(|error| {
                AppError::Validation(format!("invalid DATABASE_MAX_CONNECTIONS: {error}"))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            catalog_path,
            max_connections,
        })
    }

    pub fn require_database_url(&self) -> AppResult<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))
    }

    pub fn catalog_source(&self) -> Box<dyn CatalogSource> {
        match &self.catalog_path {
            Some(path) => Box::new(JsonFileCatalogSource::new(path.clone())),
            None => Box::new(BuiltinCatalogSource),
        }
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
