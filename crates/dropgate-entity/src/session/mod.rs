//! Login session entities: pending two-factor challenges and revoked tokens.

pub mod challenge;
pub mod revoked;

pub use challenge::LoginChallenge;
pub use revoked::RevokedToken;
