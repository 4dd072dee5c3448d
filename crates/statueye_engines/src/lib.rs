#![forbid(unsafe_code)]

pub mod access_policy;
pub mod classifier;
pub mod ranker;
pub mod report;
