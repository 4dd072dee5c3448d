#![forbid(unsafe_code)]

use crate::common::validate_bounded_text;
use crate::finding::Finding;
use crate::query::{Connectivity, Entitlement, Language, Query};
use crate::{ContractViolation, MonotonicTimeNs, SchemaVersion, Validate};

pub const SESSION_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

pub const MAX_RENDERED_MESSAGE_LEN: usize = 512;
pub const MAX_FINDINGS_PER_TURN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl Validate for SessionId {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "session_id",
                reason: "must be > 0",
            });
        }
        Ok(())
    }
}

/// One completed query/result exchange. Append-only history entry; never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub schema_version: SchemaVersion,
    pub query: Query,
    pub findings: Vec<Finding>,
    pub rendered_message: String,
    pub completed_at: MonotonicTimeNs,
}

impl Turn {
    pub fn v1(
        query: Query,
        findings: Vec<Finding>,
        rendered_message: String,
        completed_at: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let t = Self {
            schema_version: SESSION_CONTRACT_VERSION,
            query,
            findings,
            rendered_message,
            completed_at,
        };
        t.validate()?;
        Ok(t)
    }
}

impl Validate for Turn {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != SESSION_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "turn.schema_version",
                reason: "must match SESSION_CONTRACT_VERSION",
            });
        }
        self.query.validate()?;
        if self.findings.len() > MAX_FINDINGS_PER_TURN {
            return Err(ContractViolation::InvalidValue {
                field: "turn.findings",
                reason: "exceeds max entries",
            });
        }
        for finding in &self.findings {
            finding.validate()?;
        }
        validate_bounded_text(
            "turn.rendered_message",
            &self.rendered_message,
            MAX_RENDERED_MESSAGE_LEN,
        )?;
        Ok(())
    }
}

/// One user's interaction episode. Mutated only by the session engine, which
/// treats `turns` as append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub schema_version: SchemaVersion,
    pub id: SessionId,
    pub language: Language,
    pub connectivity: Connectivity,
    pub entitlement: Entitlement,
    pub turns: Vec<Turn>,
    pub created_at: MonotonicTimeNs,
}

impl Session {
    pub fn v1(
        id: SessionId,
        language: Language,
        connectivity: Connectivity,
        entitlement: Entitlement,
        created_at: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let s = Self {
            schema_version: SESSION_CONTRACT_VERSION,
            id,
            language,
            connectivity,
            entitlement,
            turns: Vec::new(),
            created_at,
        };
        s.validate()?;
        Ok(s)
    }

    /// Text of the first submitted query, if any. The report formatter leads
    /// with it.
    pub fn first_query_text(&self) -> Option<&str> {
        self.turns.first().map(|t| t.query.text.as_str())
    }

    pub fn latest_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

impl Validate for Session {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != SESSION_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "session.schema_version",
                reason: "must match SESSION_CONTRACT_VERSION",
            });
        }
        self.id.validate()?;
        for turn in &self.turns {
            turn.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{Confidence, Finding, Provenance, ProvisionId};
    use crate::query::{LegalArea, QueryId};

    fn query(text: &str) -> Query {
        Query::v1(
            QueryId(1),
            text.to_string(),
            LegalArea::TenantRights,
            MonotonicTimeNs(100),
        )
        .unwrap()
    }

    fn finding() -> Finding {
        Finding::v1(
            ProvisionId::new("p1").unwrap(),
            "Title".to_string(),
            "Description".to_string(),
            None,
            vec![],
            Confidence::new(90).unwrap(),
            Provenance::Live,
        )
        .unwrap()
    }

    #[test]
    fn turn_rejects_empty_rendered_message() {
        let t = Turn::v1(
            query("deposit dispute"),
            vec![finding()],
            "".to_string(),
            MonotonicTimeNs(200),
        );
        assert!(t.is_err());
    }

    #[test]
    fn turn_allows_zero_findings() {
        let t = Turn::v1(
            query("deposit dispute"),
            vec![],
            "No matching provisions were found.".to_string(),
            MonotonicTimeNs(200),
        );
        assert!(t.is_ok());
    }

    #[test]
    fn session_starts_with_no_turns() {
        let s = Session::v1(
            SessionId(1),
            Language::En,
            Connectivity::Offline,
            Entitlement::Free,
            MonotonicTimeNs(50),
        )
        .unwrap();
        assert!(s.turns.is_empty());
        assert_eq!(s.first_query_text(), None);
        assert!(s.latest_turn().is_none());
    }

    #[test]
    fn session_rejects_zero_id() {
        let s = Session::v1(
            SessionId(0),
            Language::En,
            Connectivity::Online,
            Entitlement::Premium,
            MonotonicTimeNs(50),
        );
        assert!(s.is_err());
    }
}
