//! Cryptographic utilities
//!
//! CSPRNG byte generation, base64url encoding, and constant-time comparison
//! for security-sensitive equality checks.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ring::rand::{SecureRandom, SystemRandom};
use subtle::ConstantTimeEq;

/// Fill a buffer of `N` bytes from the system CSPRNG.
///
/// Randomness failure here means the platform's secure random source is
/// broken; there is nothing sensible to recover to, so this panics rather
/// than returning an error the caller would have to treat as fatal anyway.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; N];
    rng.fill(&mut bytes)
        .unwrap_or_else(|_| panic!("system CSPRNG unavailable"));
    bytes
}

/// Encode bytes with the unpadded URL-safe base64 alphabet.
pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare two strings in constant time.
///
/// Used for state and challenge comparison so an attacker cannot learn
/// prefix matches from response timing.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
