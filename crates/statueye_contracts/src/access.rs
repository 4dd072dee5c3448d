#![forbid(unsafe_code)]

use crate::query::{Connectivity, Entitlement};

/// Which slice of the provision catalog a lookup is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessScope {
    Cached,
    Live,
}

impl AccessScope {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessScope::Cached => "cached",
            AccessScope::Live => "live",
        }
    }
}

/// Stable wire ids: these strings are surfaced to the UI layer and must not
/// change without a contract version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialReason {
    InvalidState,
    EmptyQuery,
    CatalogUnavailable,
}

impl DenialReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenialReason::InvalidState => "invalid-state",
            DenialReason::EmptyQuery => "empty-query",
            DenialReason::CatalogUnavailable => "catalog-unavailable",
        }
    }
}

/// Per-request access decision. Computed fresh for every submit; never
/// persisted on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessVerdict {
    Allowed(AccessScope),
    RequiresUpgrade,
    Denied(DenialReason),
}

impl AccessVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessVerdict::Allowed(AccessScope::Cached) => "allowed-cached",
            AccessVerdict::Allowed(AccessScope::Live) => "allowed-live",
            AccessVerdict::RequiresUpgrade => "requires-upgrade",
            AccessVerdict::Denied(_) => "denied",
        }
    }
}

/// Connectivity/entitlement observed by the caller at submit time. The engine
/// uses one snapshot for the whole call; it never re-reads mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessSnapshot {
    pub connectivity: Connectivity,
    pub entitlement: Entitlement,
}
