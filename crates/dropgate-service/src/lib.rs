//! # dropgate-service
//!
//! Domain services for Dropgate:
//!
//! - `share` — share-token resolution, the time/password/two-factor
//!   admission decision, and admitted downloads
//! - `file` — owner-facing listing, summary, deletion, and download history
//! - `context` — the authenticated request context services operate on

pub mod context;
pub mod file;
pub mod share;

pub use context::RequestContext;
pub use file::{FileService, UploadService};
pub use share::{AccessDecision, DenyReason, ShareAccessService};
