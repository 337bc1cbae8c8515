//! Share link token generation.

use rand::RngCore;

/// Number of random bytes in a share token (hex-encoded to 64 chars).
const TOKEN_BYTES: usize = 32;

/// Generates a cryptographically secure random token for share links.
pub fn generate_share_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
