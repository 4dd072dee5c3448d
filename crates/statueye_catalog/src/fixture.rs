#![forbid(unsafe_code)]

use std::fmt::Write as _;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use statueye_contracts::access::AccessScope;
use statueye_contracts::finding::ProvisionRecord;
use statueye_contracts::query::{LegalArea, Query};
use statueye_contracts::Validate;

use crate::catalog::{CatalogError, ProvisionCatalog};

const BUILTIN_DATASET: &str = include_str!("../data/provisions.json");
const DATASET_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct ProvisionDataset {
    schema_version: u32,
    records: Vec<ProvisionRecord>,
}

/// In-memory catalog backed by a JSON dataset. Records flagged `cached: true`
/// form the offline subset; live scope serves the full dataset. Relevance
/// order is dataset order.
#[derive(Debug, Clone)]
pub struct FixtureCatalog {
    records: Vec<ProvisionRecord>,
    live_reachable: bool,
    fingerprint: String,
}

impl FixtureCatalog {
    pub fn from_json(dataset_json: &str, live_reachable: bool) -> Result<Self, CatalogError> {
        let dataset: ProvisionDataset = serde_json::from_str(dataset_json)
            .map_err(|_| CatalogError::DatasetInvalid("dataset is not valid provision JSON"))?;
        if dataset.schema_version != DATASET_SCHEMA_VERSION {
            return Err(CatalogError::DatasetInvalid(
                "dataset schema_version is not supported",
            ));
        }
        if dataset.records.is_empty() {
            return Err(CatalogError::DatasetInvalid("dataset has no records"));
        }
        for record in &dataset.records {
            if record.validate().is_err() {
                return Err(CatalogError::DatasetInvalid(
                    "dataset record failed contract validation",
                ));
            }
        }
        Ok(Self {
            records: dataset.records,
            live_reachable,
            fingerprint: dataset_fingerprint(dataset_json),
        })
    }

    /// The dataset shipped with the client (the offline cache plus the live
    /// extension rows used by tests and demos).
    pub fn builtin(live_reachable: bool) -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_DATASET, live_reachable)
    }

    pub fn set_live_reachable(&mut self, live_reachable: bool) {
        self.live_reachable = live_reachable;
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl ProvisionCatalog for FixtureCatalog {
    fn search(
        &self,
        query: &Query,
        scope: AccessScope,
    ) -> Result<Vec<ProvisionRecord>, CatalogError> {
        if scope == AccessScope::Live && !self.live_reachable {
            return Err(CatalogError::Unavailable);
        }
        let area = query.legal_area_hint;
        Ok(self
            .records
            .iter()
            .filter(|r| area == LegalArea::Unknown || r.legal_area == area)
            .filter(|r| scope == AccessScope::Live || r.cached)
            .cloned()
            .collect())
    }

    fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn dataset_fingerprint(dataset_json: &str) -> String {
    let digest = Sha256::digest(dataset_json.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
