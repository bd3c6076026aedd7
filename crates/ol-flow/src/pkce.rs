//! PKCE (Proof Key for Code Exchange) utilities for OAuth 2.0
//!
//! Implements PKCE as defined in RFC 7636 with the S256 (SHA-256) challenge
//! method. The verifier stays on this side of the flow; only the challenge
//! travels in the authorization URL.

use ol_utils::crypto;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Verifier length in characters. RFC 7636 allows 43-128; we use 64.
const VERIFIER_LEN: usize = 64;

/// PKCE pair containing code verifier and derived challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PkcePair {
    /// Code verifier (random string, kept secret until token exchange)
    pub verifier: String,

    /// Code challenge (BASE64URL(SHA256(verifier)))
    pub challenge: String,

    /// Challenge method (always "S256")
    pub method: String,
}

/// Generate a PKCE pair for an authorization code flow
///
/// Draws 64 bytes from the system CSPRNG, encodes them with the unpadded
/// URL-safe base64 alphabet and keeps exactly 64 characters. The challenge
/// is the base64url-encoded SHA-256 hash of the verifier's ASCII bytes.
pub fn generate_pkce_pair() -> PkcePair {
    let bytes: [u8; VERIFIER_LEN] = crypto::random_bytes();
    let mut verifier = crypto::to_base64url(&bytes);
    // 64 bytes encode to 86 chars; keep the verifier at exactly 64.
    verifier.truncate(VERIFIER_LEN);

    let challenge = derive_challenge(&verifier);

    PkcePair {
        verifier,
        challenge,
        method: "S256".to_string(),
    }
}

/// Derive the S256 challenge for a verifier. Pure and deterministic.
pub fn derive_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    crypto::to_base64url(&hasher.finalize())
}

/// Check a verifier against a challenge.
///
/// Comparison is constant-time; challenge verification is an authorization
/// decision and must not leak prefix matches through timing.
pub fn verify_challenge(verifier: &str, challenge: &str) -> bool {
    crypto::constant_time_eq(&derive_challenge(verifier), challenge)
}
