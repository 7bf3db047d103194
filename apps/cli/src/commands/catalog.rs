use rolegate_application::{StaleReport, SyncReport};
use tracing::warn;

use super::database::connect_and_migrate;
use super::*;

pub fn validate_catalog(config: &CliConfig) -> AppResult<ExitCode> {
    let parsed = load_catalog(config)?;

    for error in &parsed.report.errors {
        println!("error: {error}");
    }
    for warning in &parsed.report.warnings {
        println!("warning: {warning}");
    }
    println!(
        "catalog {} ({} permission(s)): {} error(s), {} warning(s)",
        parsed.catalog.version(),
        parsed.catalog.len(),
        parsed.report.errors.len(),
        parsed.report.warnings.len()
    );

    Ok(exit_code(parsed.report.is_valid()))
}

pub async fn sync_catalog(config: &CliConfig) -> AppResult<ExitCode> {
    let catalog = load_valid_catalog(config)?;
    let pool = connect_and_migrate(config).await?;

    let report = catalog_sync_service(pool).sync(&catalog).await?;
    print!("{}", render_sync_report(&report));

    Ok(exit_code(!report.has_failures()))
}

pub fn list_catalog(
    config: &CliConfig,
    category: Option<PermissionCategory>,
) -> AppResult<ExitCode> {
    let parsed = load_catalog(config)?;
    if !parsed.report.is_valid() {
        warn!(
            errors = parsed.report.errors.len(),
            "catalog has validation errors; invalid entries are not listed"
        );
    }

    print!("{}", render_catalog(&parsed.catalog, category));
    Ok(ExitCode::SUCCESS)
}

pub async fn prune_catalog(config: &CliConfig, apply: bool) -> AppResult<ExitCode> {
    let catalog = load_valid_catalog(config)?;
    let pool = connect_and_migrate(config).await?;

    let report = catalog_sync_service(pool)
        .deactivate_stale(&catalog, apply)
        .await?;
    print!("{}", render_stale_report(&report, apply));

    Ok(exit_code(report.failures.is_empty()))
}

pub(super) fn render_sync_report(report: &SyncReport) -> String {
    let mut lines: Vec<String> = report
        .warnings
        .iter()
        .map(|warning| format!("warning: {warning}"))
        .collect();
    lines.extend(
        report
            .failures
            .iter()
            .map(|failure| format!("failed: {}: {}", failure.permission_name, failure.reason)),
    );
    lines.push(format!(
        "created: {}, updated: {}, unchanged: {}, failed: {}",
        report.created,
        report.updated,
        report.unchanged,
        report.failures.len()
    ));
    join_lines(lines)
}

pub(super) fn render_stale_report(report: &StaleReport, apply: bool) -> String {
    let mut lines: Vec<String> = report
        .stale
        .iter()
        .map(|name| format!("stale: {name}"))
        .collect();
    lines.extend(
        report
            .failures
            .iter()
            .map(|failure| format!("failed: {}: {}", failure.permission_name, failure.reason)),
    );
    if apply {
        lines.push(format!(
            "stale: {}, deactivated: {}",
            report.stale.len(),
            report.deactivated
        ));
    } else {
        lines.push(format!(
            "stale: {} (dry run, pass --apply to deactivate)",
            report.stale.len()
        ));
    }
    join_lines(lines)
}

/// Renders the catalog grouped by category with dependency and usage notes.
pub(super) fn render_catalog(
    catalog: &PermissionCatalog,
    only: Option<PermissionCategory>,
) -> String {
    let mut lines = vec![format!("catalog {}", catalog.version())];

    for category in PermissionCategory::all()
        .iter()
        .copied()
        .filter(|category| only.is_none_or(|only| only == *category))
    {
        let definitions = catalog.by_category(category);
        lines.push(String::new());
        lines.push(category_heading(category, definitions.len()));

        for definition in definitions {
            lines.push(format!(
                "  {} [{}, {}] resource: {}",
                definition.name(),
                definition.action().as_str(),
                definition.permission_type().as_str(),
                definition.resource_path()
            ));
            lines.push(format!("    {}", definition.display_name().preferred()));
            if !definition.dependencies().is_empty() {
                lines.push(format!(
                    "    depends on: {}",
                    definition.dependencies().join(", ")
                ));
            }
            if !definition.used_in().is_empty() {
                lines.push(format!("    used in: {}", definition.used_in().join(", ")));
            }
        }
    }

    join_lines(lines)
}

fn join_lines(lines: Vec<String>) -> String {
    let mut output = lines.join("\n");
    output.push('\n');
    output
}
