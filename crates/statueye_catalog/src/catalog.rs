#![forbid(unsafe_code)]

use statueye_contracts::access::AccessScope;
use statueye_contracts::finding::ProvisionRecord;
use statueye_contracts::query::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogError {
    /// Live scope was requested but the catalog has no live reachability.
    /// Callers must surface this distinguishably; silent fallback to cached
    /// data is not permitted.
    Unavailable,
    DatasetInvalid(&'static str),
}

impl CatalogError {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogError::Unavailable => "unavailable",
            CatalogError::DatasetInvalid(_) => "dataset-invalid",
        }
    }
}

/// Queryable source of legal-provision records. Implementations must return
/// records in their own relevance order; the ranker relies on that order for
/// tie-breaking and must not be handed arbitrarily shuffled rows.
pub trait ProvisionCatalog {
    fn search(
        &self,
        query: &Query,
        scope: AccessScope,
    ) -> Result<Vec<ProvisionRecord>, CatalogError>;

    /// Stable identifier of the dataset revision backing this catalog.
    fn fingerprint(&self) -> &str;
}
