//! Account lifecycle management.

pub mod manager;

pub use manager::{AccountManager, AuthenticatedUser, IssuedToken, LoginOutcome, TotpSetup};
