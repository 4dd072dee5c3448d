#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::access::AccessScope;
use crate::common::validate_bounded_text;
use crate::query::LegalArea;
use crate::{ContractViolation, SchemaVersion, Validate};

pub const FINDING_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_DESCRIPTION_LEN: usize = 1024;
pub const MAX_PENALTY_LEN: usize = 512;
pub const MAX_NEXT_STEPS: usize = 16;
pub const MAX_STEP_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvisionId(String);

impl ProvisionId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "provision_id",
                reason: "must not be empty",
            });
        }
        if id.len() > 128 {
            return Err(ContractViolation::InvalidValue {
                field: "provision_id",
                reason: "must be <= 128 chars",
            });
        }
        if id.chars().any(|c| c.is_control()) {
            return Err(ContractViolation::InvalidValue {
                field: "provision_id",
                reason: "must not contain control characters",
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for ProvisionId {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0.trim().is_empty() || self.0.len() > 128 {
            return Err(ContractViolation::InvalidValue {
                field: "provision_id",
                reason: "must be non-empty and <= 128 chars",
            });
        }
        if self.0.chars().any(|c| c.is_control()) {
            return Err(ContractViolation::InvalidValue {
                field: "provision_id",
                reason: "must not contain control characters",
            });
        }
        Ok(())
    }
}

/// Match confidence in whole percent, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Confidence(u8);

impl Confidence {
    pub fn new(value: u8) -> Result<Self, ContractViolation> {
        if value > 100 {
            return Err(ContractViolation::InvalidRange {
                field: "confidence",
                min: 0,
                max: 100,
                got: value as u32,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Validate for Confidence {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0 > 100 {
            return Err(ContractViolation::InvalidRange {
                field: "confidence",
                min: 0,
                max: 100,
                got: self.0 as u32,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Cached,
    Live,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Cached => "cached",
            Provenance::Live => "live",
        }
    }

    pub fn from_scope(scope: AccessScope) -> Self {
        match scope {
            AccessScope::Cached => Provenance::Cached,
            AccessScope::Live => Provenance::Live,
        }
    }
}

/// Raw catalog row, as stored in the provision dataset. `cached: true` marks
/// membership in the offline subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRecord {
    pub provision_id: ProvisionId,
    pub legal_area: LegalArea,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub penalty_text: Option<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    pub base_confidence: u8,
    pub cached: bool,
}

impl Validate for ProvisionRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.provision_id.validate()?;
        if self.legal_area == LegalArea::Unknown {
            return Err(ContractViolation::InvalidValue {
                field: "provision_record.legal_area",
                reason: "catalog rows must carry a concrete legal area",
            });
        }
        validate_bounded_text("provision_record.title", &self.title, MAX_TITLE_LEN)?;
        validate_bounded_text(
            "provision_record.description",
            &self.description,
            MAX_DESCRIPTION_LEN,
        )?;
        if let Some(penalty) = &self.penalty_text {
            validate_bounded_text("provision_record.penalty_text", penalty, MAX_PENALTY_LEN)?;
            if self.next_steps.is_empty() {
                return Err(ContractViolation::InvalidValue {
                    field: "provision_record.next_steps",
                    reason: "must not be empty when penalty_text is present",
                });
            }
        }
        if self.next_steps.len() > MAX_NEXT_STEPS {
            return Err(ContractViolation::InvalidValue {
                field: "provision_record.next_steps",
                reason: "exceeds max entries",
            });
        }
        for step in &self.next_steps {
            validate_bounded_text("provision_record.next_steps", step, MAX_STEP_LEN)?;
        }
        if self.base_confidence > 100 {
            return Err(ContractViolation::InvalidRange {
                field: "provision_record.base_confidence",
                min: 0,
                max: 100,
                got: self.base_confidence as u32,
            });
        }
        Ok(())
    }
}

/// A ranked, annotated provision match as surfaced to the UI. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub schema_version: SchemaVersion,
    pub provision_id: ProvisionId,
    pub title: String,
    pub description: String,
    pub penalty_text: Option<String>,
    pub next_steps: Vec<String>,
    pub confidence: Confidence,
    pub provenance: Provenance,
}

impl Finding {
    pub fn v1(
        provision_id: ProvisionId,
        title: String,
        description: String,
        penalty_text: Option<String>,
        next_steps: Vec<String>,
        confidence: Confidence,
        provenance: Provenance,
    ) -> Result<Self, ContractViolation> {
        let f = Self {
            schema_version: FINDING_CONTRACT_VERSION,
            provision_id,
            title,
            description,
            penalty_text,
            next_steps,
            confidence,
            provenance,
        };
        f.validate()?;
        Ok(f)
    }
}

impl Validate for Finding {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != FINDING_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "finding.schema_version",
                reason: "must match FINDING_CONTRACT_VERSION",
            });
        }
        self.provision_id.validate()?;
        validate_bounded_text("finding.title", &self.title, MAX_TITLE_LEN)?;
        validate_bounded_text("finding.description", &self.description, MAX_DESCRIPTION_LEN)?;
        if let Some(penalty) = &self.penalty_text {
            validate_bounded_text("finding.penalty_text", penalty, MAX_PENALTY_LEN)?;
            if self.next_steps.is_empty() {
                return Err(ContractViolation::InvalidValue {
                    field: "finding.next_steps",
                    reason: "must not be empty when penalty_text is present",
                });
            }
        }
        if self.next_steps.len() > MAX_NEXT_STEPS {
            return Err(ContractViolation::InvalidValue {
                field: "finding.next_steps",
                reason: "exceeds max entries",
            });
        }
        for step in &self.next_steps {
            validate_bounded_text("finding.next_steps", step, MAX_STEP_LEN)?;
        }
        self.confidence.validate()?;
        Ok(())
    }
}
