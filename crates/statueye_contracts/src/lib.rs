#![forbid(unsafe_code)]

pub mod access;
pub mod common;
pub mod finding;
pub mod query;
pub mod session;

pub use common::{
    ContractViolation, MonotonicTimeNs, ReasonCodeId, SchemaVersion, Validate,
};
