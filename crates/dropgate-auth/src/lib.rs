//! # dropgate-auth
//!
//! Authentication for Dropgate: credential verification, the two-step
//! login protocol, access-token issuance and revocation, and two-factor
//! enrollment.
//!
//! ## Modules
//!
//! - `jwt` — access token creation, validation, and blacklist consultation
//! - `password` — Argon2id password hashing and policy enforcement
//! - `totp` — RFC 6238 one-time codes and QR provisioning
//! - `correlation` — time-ordered correlation identifiers for pending logins
//! - `account` — the account lifecycle manager tying it all together

pub mod account;
pub mod correlation;
pub mod jwt;
pub mod password;
pub mod totp;

pub use account::{AccountManager, AuthenticatedUser, IssuedToken, LoginOutcome, TotpSetup};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use totp::TotpEngine;
