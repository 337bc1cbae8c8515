//! # dropgate-api
//!
//! Axum HTTP layer for Dropgate: application state, routing, request and
//! response DTOs, extractors, and the error-to-status mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
