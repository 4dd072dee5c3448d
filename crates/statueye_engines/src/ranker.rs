#![forbid(unsafe_code)]

use statueye_contracts::access::AccessScope;
use statueye_contracts::finding::{Confidence, Finding, Provenance, ProvisionRecord};
use statueye_contracts::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankerConfig {
    /// Points subtracted from base confidence for cached-scope results. The
    /// source client showed cached findings roughly 15-20 points below live
    /// ones; the exact value is configuration, not contract.
    pub cached_penalty: u8,
}

impl RankerConfig {
    pub fn mvp_v1() -> Self {
        Self { cached_penalty: 15 }
    }
}

/// Orders and annotates raw catalog records. Pure function of its inputs:
/// identical records and scope always yield identical output.
#[derive(Debug, Clone)]
pub struct RankerRuntime {
    config: RankerConfig,
}

impl RankerRuntime {
    pub fn new(config: RankerConfig) -> Self {
        Self { config }
    }

    pub fn rank(&self, records: &[ProvisionRecord], scope: AccessScope) -> Vec<Finding> {
        let provenance = Provenance::from_scope(scope);
        let mut findings: Vec<Finding> = records
            .iter()
            .filter(|r| r.validate().is_ok())
            .filter_map(|r| {
                let confidence = Confidence::new(self.scoped_confidence(r, scope)).ok()?;
                Finding::v1(
                    r.provision_id.clone(),
                    r.title.clone(),
                    r.description.clone(),
                    r.penalty_text.clone(),
                    r.next_steps.clone(),
                    confidence,
                    provenance,
                )
                .ok()
            })
            .collect();
        // Stable sort: equal-confidence findings keep the catalog's relevance
        // order so output is deterministic for identical input.
        findings.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        findings
    }

    fn scoped_confidence(&self, record: &ProvisionRecord, scope: AccessScope) -> u8 {
        match scope {
            AccessScope::Live => record.base_confidence,
            AccessScope::Cached => record
                .base_confidence
                .saturating_sub(self.config.cached_penalty),
        }
    }
}
