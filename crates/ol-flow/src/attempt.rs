//! CSRF state generation and the single-slot authorization attempt
//!
//! One login may be in flight at a time. `AttemptSlot` binds exactly one
//! state value to one PKCE verifier; beginning a new attempt replaces the
//! old one so a stale attempt can never validate a later callback.

use chrono::{DateTime, Utc};
use ol_utils::crypto;
use parking_lot::Mutex;
use tracing::debug;

use crate::pkce::{generate_pkce_pair, PkcePair};

/// Generate a random state string for CSRF protection
///
/// 32 CSPRNG bytes, base64url-no-pad encoded (43 characters, 256 bits of
/// entropy). Round-tripped through the provider and compared on callback.
pub fn generate_state() -> String {
    let bytes: [u8; 32] = crypto::random_bytes();
    crypto::to_base64url(&bytes)
}

/// One outstanding authorization request
#[derive(Debug, Clone)]
pub struct AuthorizationAttempt {
    /// CSRF state bound to this attempt
    pub state: String,

    /// PKCE pair bound to this attempt
    pub pkce: PkcePair,

    /// When the attempt was started
    pub created_at: DateTime<Utc>,
}

/// Holder for the at-most-one pending authorization attempt.
///
/// `validate`/`verifier_for`/`clear` may race with a late duplicate
/// callback; all of them are safe after `clear()` (validate returns false,
/// repeated clear is a no-op).
#[derive(Debug, Default)]
pub struct AttemptSlot {
    current: Mutex<Option<AuthorizationAttempt>>,
}

impl AttemptSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh attempt, atomically replacing any prior one.
    ///
    /// Returns a snapshot of the new attempt for URL construction. The old
    /// attempt (if any) becomes unvalidatable from this point on.
    pub fn begin(&self) -> AuthorizationAttempt {
        let attempt = AuthorizationAttempt {
            state: generate_state(),
            pkce: generate_pkce_pair(),
            created_at: Utc::now(),
        };

        let mut current = self.current.lock();
        if current.is_some() {
            debug!("Replacing pending authorization attempt");
        }
        *current = Some(attempt.clone());

        attempt
    }

    /// True iff `candidate` matches the pending attempt's state.
    ///
    /// Non-consuming: the caller may still need to check for a provider
    /// error before deciding the attempt is done. Constant-time comparison,
    /// same as challenge verification.
    pub fn validate(&self, candidate: &str) -> bool {
        match self.current.lock().as_ref() {
            Some(attempt) => crypto::constant_time_eq(candidate, &attempt.state),
            None => false,
        }
    }

    /// The stored PKCE verifier, iff `validate(candidate)` would succeed.
    pub fn verifier_for(&self, candidate: &str) -> Option<String> {
        let current = self.current.lock();
        match current.as_ref() {
            Some(attempt) if crypto::constant_time_eq(candidate, &attempt.state) => {
                Some(attempt.pkce.verifier.clone())
            }
            _ => None,
        }
    }

    /// Discard the pending attempt. Idempotent.
    ///
    /// Must be called on terminal success or failure so a used authorization
    /// code cannot be replayed against a now-irrelevant verifier.
    pub fn clear(&self) {
        *self.current.lock() = None;
    }

    /// Whether an attempt is outstanding.
    pub fn is_pending(&self) -> bool {
        self.current.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_shape() {
        let state = generate_state();
        assert_eq!(state.len(), 43); // 32 bytes base64url, no padding
        assert!(state
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_state_uniqueness() {
        let mut states = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(states.insert(generate_state()), "Generated duplicate state");
        }
    }

    #[test]
    fn test_begin_and_validate() {
        let slot = AttemptSlot::new();
        assert!(!slot.is_pending());

        let attempt = slot.begin();
        assert!(slot.is_pending());
        assert!(slot.validate(&attempt.state));
        assert!(!slot.validate("not-the-state"));
    }

    #[test]
    fn test_second_begin_invalidates_first() {
        let slot = AttemptSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(!slot.validate(&first.state));
        assert!(slot.validate(&second.state));
    }

    #[test]
    fn test_verifier_for() {
        let slot = AttemptSlot::new();
        let attempt = slot.begin();

        assert_eq!(
            slot.verifier_for(&attempt.state),
            Some(attempt.pkce.verifier.clone())
        );
        assert_eq!(slot.verifier_for("wrong-state"), None);
    }

    #[test]
    fn test_validate_is_non_consuming() {
        let slot = AttemptSlot::new();
        let attempt = slot.begin();

        assert!(slot.validate(&attempt.state));
        assert!(slot.validate(&attempt.state));
        assert!(slot.is_pending());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let slot = AttemptSlot::new();
        let attempt = slot.begin();

        slot.clear();
        assert!(!slot.validate(&attempt.state));
        assert_eq!(slot.verifier_for(&attempt.state), None);

        // Second clear and late validate must both be safe no-ops
        slot.clear();
        assert!(!slot.validate(&attempt.state));
    }

    #[test]
    fn test_empty_slot_validates_nothing() {
        let slot = AttemptSlot::new();
        assert!(!slot.validate(""));
        assert!(!slot.validate("anything"));
        assert_eq!(slot.verifier_for("anything"), None);
    }
}
