//! # dropgate-core
//!
//! Core crate for Dropgate. Contains the unified error system, shared
//! pagination/sorting types, configuration schemas, and the capability
//! traits (clock, blob storage) the rest of the workspace is built on.
//!
//! This crate has **no** internal dependencies on other Dropgate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
