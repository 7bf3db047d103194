use rolegate_core::AppResult;
use rolegate_domain::ParsedCatalog;

/// Port that yields the authored catalog once at process start.
pub trait CatalogSource: Send + Sync {
    /// Loads and parses the catalog, reporting every authoring finding.
    fn load(&self) -> AppResult<ParsedCatalog>;

    /// Returns a short label describing where the catalog came from.
    fn describe(&self) -> String;
}
