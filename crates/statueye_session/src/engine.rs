#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use statueye_catalog::{CatalogError, ProvisionCatalog};
use statueye_contracts::access::{AccessSnapshot, AccessVerdict, DenialReason};
use statueye_contracts::query::{
    Connectivity, Entitlement, Language, LegalArea, Query, QueryId,
};
use statueye_contracts::session::{Session, SessionId, Turn};
use statueye_contracts::{ContractViolation, MonotonicTimeNs, ReasonCodeId};
use statueye_engines::access_policy::AccessPolicyRuntime;
use statueye_engines::classifier::{ClassifyBudget, QueryClassifier};
use statueye_engines::ranker::{RankerConfig, RankerRuntime};
use statueye_engines::report::{ReportError, ReportRuntime};

use crate::cancel::CancelToken;

pub mod reason_codes {
    use statueye_contracts::ReasonCodeId;

    // SESSION reason-code namespace.
    pub const SESSION_TURN_COMPLETED: ReasonCodeId = ReasonCodeId(0x5345_0001);
    pub const SESSION_BLOCKED_UPGRADE: ReasonCodeId = ReasonCodeId(0x5345_0002);

    pub const SESSION_BLOCKED_EMPTY_QUERY: ReasonCodeId = ReasonCodeId(0x5345_00F1);
    pub const SESSION_BLOCKED_CATALOG_UNAVAILABLE: ReasonCodeId = ReasonCodeId(0x5345_00F2);
    pub const SESSION_BLOCKED_INVALID_STATE: ReasonCodeId = ReasonCodeId(0x5345_00F3);
    pub const SESSION_BUSY: ReasonCodeId = ReasonCodeId(0x5345_00F4);
    pub const SESSION_CANCELLED: ReasonCodeId = ReasonCodeId(0x5345_00F5);
    pub const SESSION_EMPTY_EXPORT: ReasonCodeId = ReasonCodeId(0x5345_00F6);
    pub const SESSION_UNKNOWN: ReasonCodeId = ReasonCodeId(0x5345_00F7);
    pub const SESSION_CONTRACT_INVALID: ReasonCodeId = ReasonCodeId(0x5345_00F8);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    UnknownSession,
    /// A submit is already in flight for this session. Overlapping
    /// submissions are rejected, never interleaved.
    Busy,
    Cancelled,
    EmptyExport,
    Contract(ContractViolation),
}

impl SessionError {
    pub fn reason_code(&self) -> ReasonCodeId {
        match self {
            SessionError::UnknownSession => reason_codes::SESSION_UNKNOWN,
            SessionError::Busy => reason_codes::SESSION_BUSY,
            SessionError::Cancelled => reason_codes::SESSION_CANCELLED,
            SessionError::EmptyExport => reason_codes::SESSION_EMPTY_EXPORT,
            SessionError::Contract(_) => reason_codes::SESSION_CONTRACT_INVALID,
        }
    }
}

/// A submit blocked by policy or catalog availability. Carries the verdict
/// for the UI (upgrade prompt, denial message) plus the reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockedOutcome {
    pub verdict: AccessVerdict,
    pub reason_code: ReasonCodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Completed(Turn),
    Blocked(BlockedOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEngineConfig {
    pub classify_budget: ClassifyBudget,
}

impl SessionEngineConfig {
    pub fn mvp_v1() -> Self {
        Self {
            classify_budget: ClassifyBudget::mvp_v1(),
        }
    }
}

/// Owns session lifecycles and runs the submit pipeline: snapshot capture,
/// empty-query fast fail, classification, access policy, catalog search,
/// ranking, atomic turn append.
#[derive(Debug)]
pub struct SessionEngine<C, Q> {
    config: SessionEngineConfig,
    policy: AccessPolicyRuntime,
    ranker: RankerRuntime,
    report: ReportRuntime,
    catalog: C,
    classifier: Q,
    sessions: BTreeMap<SessionId, Session>,
    in_flight: BTreeSet<SessionId>,
    next_session_id: u64,
    next_query_id: u64,
}

impl<C, Q> SessionEngine<C, Q>
where
    C: ProvisionCatalog,
    Q: QueryClassifier,
{
    pub fn new(
        catalog: C,
        classifier: Q,
        config: SessionEngineConfig,
        ranker_config: RankerConfig,
    ) -> Self {
        Self {
            config,
            policy: AccessPolicyRuntime::new(),
            ranker: RankerRuntime::new(ranker_config),
            report: ReportRuntime::new(),
            catalog,
            classifier,
            sessions: BTreeMap::new(),
            in_flight: BTreeSet::new(),
            next_session_id: 1,
            next_query_id: 1,
        }
    }

    pub fn create_session(
        &mut self,
        language: Language,
        connectivity: Connectivity,
        entitlement: Entitlement,
        now: MonotonicTimeNs,
    ) -> Result<SessionId, SessionError> {
        let id = SessionId(self.next_session_id);
        let session = Session::v1(id, language, connectivity, entitlement, now)
            .map_err(SessionError::Contract)?;
        self.next_session_id += 1;
        self.sessions.insert(id, session);
        Ok(id)
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// The only mutating operation. On `Completed` the new turn has been
    /// appended and the session's stored connectivity/entitlement snapshot
    /// refreshed; on `Blocked`, `Err(Cancelled)`, or any other error the
    /// session is exactly as it was before the call.
    pub fn submit_query(
        &mut self,
        session_id: SessionId,
        text: &str,
        area_hint: Option<LegalArea>,
        snapshot: AccessSnapshot,
        now: MonotonicTimeNs,
        cancel: &CancelToken,
    ) -> Result<SubmitOutcome, SessionError> {
        if !self.sessions.contains_key(&session_id) {
            return Err(SessionError::UnknownSession);
        }
        if !self.in_flight.insert(session_id) {
            return Err(SessionError::Busy);
        }
        let out = self.submit_inner(session_id, text, area_hint, snapshot, now, cancel);
        self.in_flight.remove(&session_id);
        out
    }

    fn submit_inner(
        &mut self,
        session_id: SessionId,
        text: &str,
        area_hint: Option<LegalArea>,
        snapshot: AccessSnapshot,
        now: MonotonicTimeNs,
        cancel: &CancelToken,
    ) -> Result<SubmitOutcome, SessionError> {
        // The caller's snapshot governs the whole call; a connectivity change
        // mid-flight never alters a turn already under construction. The
        // session's stored snapshot is refreshed only when the turn commits,
        // so blocked or cancelled calls leave the session untouched.
        let language = self
            .sessions
            .get(&session_id)
            .ok_or(SessionError::UnknownSession)?
            .language;

        if text.trim().is_empty() {
            return Ok(SubmitOutcome::Blocked(blocked_denied(
                DenialReason::EmptyQuery,
            )));
        }

        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        let area = match area_hint {
            Some(area) => area,
            None => self.classifier.classify(text, self.config.classify_budget),
        };
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }

        let verdict = self
            .policy
            .evaluate(snapshot.connectivity, snapshot.entitlement, area);
        let scope = match verdict {
            AccessVerdict::Allowed(scope) => scope,
            AccessVerdict::RequiresUpgrade => {
                return Ok(SubmitOutcome::Blocked(blocked_upgrade()))
            }
            AccessVerdict::Denied(reason) => {
                return Ok(SubmitOutcome::Blocked(blocked_denied(reason)))
            }
        };

        let query = Query::v1(QueryId(self.next_query_id), text.to_string(), area, now)
            .map_err(SessionError::Contract)?;
        self.next_query_id += 1;

        let records = match self.catalog.search(&query, scope) {
            Ok(records) => records,
            Err(CatalogError::Unavailable) => {
                return Ok(SubmitOutcome::Blocked(blocked_denied(
                    DenialReason::CatalogUnavailable,
                )))
            }
            Err(CatalogError::DatasetInvalid(_)) => {
                return Ok(SubmitOutcome::Blocked(blocked_denied(
                    DenialReason::InvalidState,
                )))
            }
        };
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }

        let findings = self.ranker.rank(&records, scope);
        let message = summary_message(language, area, findings.len());
        let turn = Turn::v1(query, findings, message, now).map_err(SessionError::Contract)?;

        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionError::UnknownSession)?;
        session.connectivity = snapshot.connectivity;
        session.entitlement = snapshot.entitlement;
        session.turns.push(turn.clone());
        Ok(SubmitOutcome::Completed(turn))
    }

    pub fn export_report(&self, session_id: SessionId) -> Result<String, SessionError> {
        let session = self
            .sessions
            .get(&session_id)
            .ok_or(SessionError::UnknownSession)?;
        self.report
            .render(session, self.catalog.fingerprint())
            .map_err(|e| match e {
                ReportError::EmptySession => SessionError::EmptyExport,
            })
    }

    #[cfg(test)]
    fn force_in_flight(&mut self, session_id: SessionId) {
        self.in_flight.insert(session_id);
    }
}

fn blocked_upgrade() -> BlockedOutcome {
    BlockedOutcome {
        verdict: AccessVerdict::RequiresUpgrade,
        reason_code: reason_codes::SESSION_BLOCKED_UPGRADE,
    }
}

fn blocked_denied(reason: DenialReason) -> BlockedOutcome {
    let reason_code = match reason {
        DenialReason::EmptyQuery => reason_codes::SESSION_BLOCKED_EMPTY_QUERY,
        DenialReason::CatalogUnavailable => reason_codes::SESSION_BLOCKED_CATALOG_UNAVAILABLE,
        DenialReason::InvalidState => reason_codes::SESSION_BLOCKED_INVALID_STATE,
    };
    BlockedOutcome {
        verdict: AccessVerdict::Denied(reason),
        reason_code,
    }
}

fn summary_message(language: Language, area: LegalArea, finding_count: usize) -> String {
    match (language, finding_count) {
        (Language::En, 0) => format!(
            "I've analyzed your {} concern and found no matching legal provisions in the available data.",
            area.label()
        ),
        (Language::En, n) => format!(
            "I've analyzed your {} concern and found {n} potentially relevant legal provisions. Here are the key findings:",
            area.label()
        ),
        (Language::Es, 0) => "He analizado su consulta legal y no encontré disposiciones legales coincidentes en los datos disponibles.".to_string(),
        (Language::Es, n) => format!(
            "He analizado su consulta legal y encontré {n} disposiciones legales potencialmente relevantes. Estos son los hallazgos principales:"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statueye_catalog::FixtureCatalog;
    use statueye_engines::classifier::KeywordClassifier;

    fn engine(live_reachable: bool) -> SessionEngine<FixtureCatalog, KeywordClassifier> {
        SessionEngine::new(
            FixtureCatalog::builtin(live_reachable).unwrap(),
            KeywordClassifier::new(),
            SessionEngineConfig::mvp_v1(),
            RankerConfig::mvp_v1(),
        )
    }

    fn snapshot(connectivity: Connectivity, entitlement: Entitlement) -> AccessSnapshot {
        AccessSnapshot {
            connectivity,
            entitlement,
        }
    }

    #[test]
    fn at_engine_01_busy_session_rejects_second_submit() {
        let mut engine = engine(true);
        let id = engine
            .create_session(
                Language::En,
                Connectivity::Online,
                Entitlement::Premium,
                MonotonicTimeNs(1),
            )
            .unwrap();
        engine.force_in_flight(id);
        let out = engine.submit_query(
            id,
            "my landlord won't fix the heating",
            None,
            snapshot(Connectivity::Online, Entitlement::Premium),
            MonotonicTimeNs(2),
            &CancelToken::new(),
        );
        assert_eq!(out, Err(SessionError::Busy));
    }

    #[test]
    fn at_engine_02_busy_marker_released_after_completion() {
        let mut engine = engine(true);
        let id = engine
            .create_session(
                Language::En,
                Connectivity::Online,
                Entitlement::Premium,
                MonotonicTimeNs(1),
            )
            .unwrap();
        for turn_no in 0..2u64 {
            let out = engine
                .submit_query(
                    id,
                    "my landlord won't fix the heating",
                    None,
                    snapshot(Connectivity::Online, Entitlement::Premium),
                    MonotonicTimeNs(10 + turn_no),
                    &CancelToken::new(),
                )
                .unwrap();
            assert!(matches!(out, SubmitOutcome::Completed(_)));
        }
        assert_eq!(engine.session(id).unwrap().turns.len(), 2);
    }

    #[test]
    fn at_engine_03_unknown_session_is_rejected() {
        let mut engine = engine(true);
        let out = engine.submit_query(
            SessionId(99),
            "anything",
            None,
            snapshot(Connectivity::Online, Entitlement::Premium),
            MonotonicTimeNs(2),
            &CancelToken::new(),
        );
        assert_eq!(out, Err(SessionError::UnknownSession));
    }

    #[test]
    fn at_engine_04_snapshot_refreshes_session_state() {
        let mut engine = engine(true);
        let id = engine
            .create_session(
                Language::En,
                Connectivity::Offline,
                Entitlement::Free,
                MonotonicTimeNs(1),
            )
            .unwrap();
        let _ = engine
            .submit_query(
                id,
                "my landlord won't fix the heating",
                None,
                snapshot(Connectivity::Online, Entitlement::Premium),
                MonotonicTimeNs(2),
                &CancelToken::new(),
            )
            .unwrap();
        let session = engine.session(id).unwrap();
        assert_eq!(session.connectivity, Connectivity::Online);
        assert_eq!(session.entitlement, Entitlement::Premium);
    }

    #[test]
    fn at_engine_05_summary_message_localized_per_session_language() {
        let mut engine = engine(true);
        let id = engine
            .create_session(
                Language::Es,
                Connectivity::Online,
                Entitlement::Premium,
                MonotonicTimeNs(1),
            )
            .unwrap();
        let out = engine
            .submit_query(
                id,
                "my landlord won't fix the heating",
                None,
                snapshot(Connectivity::Online, Entitlement::Premium),
                MonotonicTimeNs(2),
                &CancelToken::new(),
            )
            .unwrap();
        let SubmitOutcome::Completed(turn) = out else {
            panic!("expected completed turn");
        };
        assert!(turn.rendered_message.starts_with("He analizado"));
    }

    #[test]
    fn at_engine_06_explicit_area_hint_skips_classifier() {
        let mut engine = engine(true);
        let id = engine
            .create_session(
                Language::En,
                Connectivity::Online,
                Entitlement::Premium,
                MonotonicTimeNs(1),
            )
            .unwrap();
        let out = engine
            .submit_query(
                id,
                "something happened and I need help",
                Some(LegalArea::Consumer),
                snapshot(Connectivity::Online, Entitlement::Premium),
                MonotonicTimeNs(2),
                &CancelToken::new(),
            )
            .unwrap();
        let SubmitOutcome::Completed(turn) = out else {
            panic!("expected completed turn");
        };
        assert_eq!(turn.query.legal_area_hint, LegalArea::Consumer);
        assert!(turn
            .findings
            .iter()
            .all(|f| f.provision_id.as_str().contains("consumer")));
    }

    #[test]
    fn at_engine_07_cancelled_submit_leaves_stored_snapshot_untouched() {
        let token = CancelToken::new();
        token.cancel();
        let mut engine = engine(true);
        let id = engine
            .create_session(
                Language::En,
                Connectivity::Offline,
                Entitlement::Free,
                MonotonicTimeNs(1),
            )
            .unwrap();
        let out = engine.submit_query(
            id,
            "my landlord won't fix the heating",
            None,
            snapshot(Connectivity::Online, Entitlement::Premium),
            MonotonicTimeNs(2),
            &token,
        );
        assert_eq!(out, Err(SessionError::Cancelled));
        let session = engine.session(id).unwrap();
        assert_eq!(session.connectivity, Connectivity::Offline);
        assert_eq!(session.entitlement, Entitlement::Free);
        assert!(session.turns.is_empty());
    }

    #[test]
    fn at_engine_08_blocked_submit_leaves_stored_snapshot_untouched() {
        let mut engine = engine(true);
        let id = engine
            .create_session(
                Language::En,
                Connectivity::Offline,
                Entitlement::Free,
                MonotonicTimeNs(1),
            )
            .unwrap();
        let before = engine.session(id).unwrap().clone();
        let out = engine
            .submit_query(
                id,
                "my landlord won't fix the heating",
                None,
                snapshot(Connectivity::Online, Entitlement::Free),
                MonotonicTimeNs(2),
                &CancelToken::new(),
            )
            .unwrap();
        let SubmitOutcome::Blocked(blocked) = out else {
            panic!("expected blocked outcome");
        };
        assert_eq!(blocked.verdict, AccessVerdict::RequiresUpgrade);
        assert_eq!(engine.session(id).unwrap(), &before);
    }
}
