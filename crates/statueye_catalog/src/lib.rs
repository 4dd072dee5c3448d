#![forbid(unsafe_code)]

pub mod catalog;
pub mod fixture;

pub use catalog::{CatalogError, ProvisionCatalog};
pub use fixture::FixtureCatalog;
