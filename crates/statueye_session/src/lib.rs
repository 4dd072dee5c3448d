#![forbid(unsafe_code)]

pub mod cancel;
pub mod engine;

pub use cancel::CancelToken;
pub use engine::{
    BlockedOutcome, SessionEngine, SessionEngineConfig, SessionError, SubmitOutcome,
};
