#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::validate_bounded_text;
use crate::{ContractViolation, MonotonicTimeNs, SchemaVersion, Validate};

pub const QUERY_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

pub const MAX_QUERY_TEXT_LEN: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Es,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Connectivity::Online => "online",
            Connectivity::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entitlement {
    Free,
    Premium,
}

impl Entitlement {
    pub fn as_str(self) -> &'static str {
        match self {
            Entitlement::Free => "free",
            Entitlement::Premium => "premium",
        }
    }
}

/// Legal areas selectable in the client, plus the classifier's best-effort
/// fallback. Serialized ids are the client's stable kebab-case area ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegalArea {
    TenantRights,
    Employment,
    Dui,
    Consumer,
    Traffic,
    Drugs,
    Unknown,
}

impl LegalArea {
    pub fn as_str(self) -> &'static str {
        match self {
            LegalArea::TenantRights => "tenant-rights",
            LegalArea::Employment => "employment",
            LegalArea::Dui => "dui",
            LegalArea::Consumer => "consumer",
            LegalArea::Traffic => "traffic",
            LegalArea::Drugs => "drugs",
            LegalArea::Unknown => "unknown",
        }
    }

    /// Human-readable label used in rendered summary messages.
    pub fn label(self) -> &'static str {
        match self {
            LegalArea::TenantRights => "tenant rights",
            LegalArea::Employment => "employment",
            LegalArea::Dui => "DUI/DWI",
            LegalArea::Consumer => "consumer",
            LegalArea::Traffic => "traffic",
            LegalArea::Drugs => "drug usage",
            LegalArea::Unknown => "legal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryId(pub u64);

impl Validate for QueryId {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "query_id",
                reason: "must be > 0",
            });
        }
        Ok(())
    }
}

/// One submitted user query. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub schema_version: SchemaVersion,
    pub id: QueryId,
    pub text: String,
    pub legal_area_hint: LegalArea,
    pub submitted_at: MonotonicTimeNs,
}

impl Query {
    pub fn v1(
        id: QueryId,
        text: String,
        legal_area_hint: LegalArea,
        submitted_at: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let q = Self {
            schema_version: QUERY_CONTRACT_VERSION,
            id,
            text,
            legal_area_hint,
            submitted_at,
        };
        q.validate()?;
        Ok(q)
    }
}

impl Validate for Query {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != QUERY_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "query.schema_version",
                reason: "must match QUERY_CONTRACT_VERSION",
            });
        }
        self.id.validate()?;
        validate_bounded_text("query.text", &self.text, MAX_QUERY_TEXT_LEN)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_rejects_empty_text() {
        let q = Query::v1(
            QueryId(1),
            "   ".to_string(),
            LegalArea::TenantRights,
            MonotonicTimeNs(10),
        );
        assert!(q.is_err());
    }

    #[test]
    fn query_accepts_multiline_text() {
        let q = Query::v1(
            QueryId(1),
            "my landlord won't fix the heating\nit has been three weeks".to_string(),
            LegalArea::Unknown,
            MonotonicTimeNs(10),
        );
        assert!(q.is_ok());
    }

    #[test]
    fn query_rejects_zero_id() {
        let q = Query::v1(
            QueryId(0),
            "deposit dispute".to_string(),
            LegalArea::TenantRights,
            MonotonicTimeNs(10),
        );
        assert!(q.is_err());
    }

    #[test]
    fn legal_area_ids_are_stable() {
        assert_eq!(LegalArea::TenantRights.as_str(), "tenant-rights");
        assert_eq!(LegalArea::Dui.as_str(), "dui");
        assert_eq!(LegalArea::Unknown.as_str(), "unknown");
    }
}
