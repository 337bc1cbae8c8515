//! Share access control.

pub mod access;
pub mod link;

pub use access::{AccessDecision, DenyReason, DownloadResult, ShareAccessService};
