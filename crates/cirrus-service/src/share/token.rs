//! Public share link token generation.

use rand::Rng;

/// Generate a 128-bit random token, hex encoded.
///
/// Tokens are capability-bearing: possession grants access, so uniqueness
/// is probabilistic rather than checked against the store.
pub fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
