#![forbid(unsafe_code)]

use statueye_contracts::access::{AccessScope, AccessVerdict};
use statueye_contracts::query::{Connectivity, Entitlement, LegalArea};
use statueye_contracts::ReasonCodeId;

pub mod reason_codes {
    use statueye_contracts::ReasonCodeId;

    // ACCESS reason-code namespace.
    pub const ACCESS_OFFLINE_CACHED: ReasonCodeId = ReasonCodeId(0x4143_0001);
    pub const ACCESS_PREMIUM_LIVE: ReasonCodeId = ReasonCodeId(0x4143_0002);
    pub const ACCESS_UPGRADE_REQUIRED: ReasonCodeId = ReasonCodeId(0x4143_0003);
    pub const ACCESS_DENIED: ReasonCodeId = ReasonCodeId(0x4143_00F1);
}

/// Pure access decision: (connectivity, entitlement, area) -> verdict.
///
/// Rule order is load-bearing: connectivity is checked before entitlement so
/// that offline users are always served from cache instead of being prompted
/// to upgrade. Premium gating only applies when the live database could
/// actually be consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicyRuntime;

impl AccessPolicyRuntime {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        connectivity: Connectivity,
        entitlement: Entitlement,
        _area: LegalArea,
    ) -> AccessVerdict {
        match (connectivity, entitlement) {
            (Connectivity::Offline, _) => AccessVerdict::Allowed(AccessScope::Cached),
            (Connectivity::Online, Entitlement::Premium) => {
                AccessVerdict::Allowed(AccessScope::Live)
            }
            (Connectivity::Online, Entitlement::Free) => AccessVerdict::RequiresUpgrade,
        }
    }
}

pub fn verdict_reason_code(verdict: AccessVerdict) -> ReasonCodeId {
    match verdict {
        AccessVerdict::Allowed(AccessScope::Cached) => reason_codes::ACCESS_OFFLINE_CACHED,
        AccessVerdict::Allowed(AccessScope::Live) => reason_codes::ACCESS_PREMIUM_LIVE,
        AccessVerdict::RequiresUpgrade => reason_codes::ACCESS_UPGRADE_REQUIRED,
        AccessVerdict::Denied(_) => reason_codes::ACCESS_DENIED,
    }
}
