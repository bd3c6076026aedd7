//! Redirect callback classification
//!
//! Turns an arbitrary navigated URL into a typed outcome and validates it
//! against the pending attempt. Pure classification: nothing here mutates
//! the attempt slot, the session decides when to clear it.

use url::Url;

use crate::attempt::AttemptSlot;

/// Outcome of interpreting one callback URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Callback carried a code and a state matching the pending attempt
    Success { code: String, state: String },

    /// Provider rejected the request (e.g. `access_denied`)
    ProviderError {
        code: String,
        description: Option<String>,
    },

    /// Callback carried a code but its state does not match the pending
    /// attempt. Possible CSRF; must never proceed to code exchange.
    StateMismatch,

    /// Not a callback for this flow (wrong scheme/host, unparseable, or
    /// missing parameters). Ignorable: keep waiting.
    Malformed,
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// Classify a navigated URL against the pending attempt.
///
/// An `error` parameter takes precedence over anything else the provider
/// put in the URL. A code with a non-matching state is reported as
/// `StateMismatch`, distinct from a provider error.
pub fn interpret_redirect(
    callback_url: &str,
    expected_scheme: &str,
    expected_host: &str,
    slot: &AttemptSlot,
) -> RedirectOutcome {
    let url = match Url::parse(callback_url) {
        Ok(url) => url,
        Err(_) => return RedirectOutcome::Malformed,
    };

    if url.scheme() != expected_scheme || url.host_str() != Some(expected_host) {
        return RedirectOutcome::Malformed;
    }

    if let Some(error) = query_param(&url, "error") {
        return RedirectOutcome::ProviderError {
            code: error,
            description: query_param(&url, "error_description"),
        };
    }

    match (query_param(&url, "code"), query_param(&url, "state")) {
        (Some(code), Some(state)) => {
            if slot.validate(&state) {
                RedirectOutcome::Success { code, state }
            } else {
                RedirectOutcome::StateMismatch
            }
        }
        _ => RedirectOutcome::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEME: &str = "octolink";
    const HOST: &str = "callback";

    fn interpret(url: &str, slot: &AttemptSlot) -> RedirectOutcome {
        interpret_redirect(url, SCHEME, HOST, slot)
    }

    #[test]
    fn test_success_with_matching_state() {
        let slot = AttemptSlot::new();
        let attempt = slot.begin();
        let url = format!("octolink://callback?code=abc123&state={}", attempt.state);

        assert_eq!(
            interpret(&url, &slot),
            RedirectOutcome::Success {
                code: "abc123".to_string(),
                state: attempt.state,
            }
        );
        // Classification did not consume the attempt
        assert!(slot.is_pending());
    }

    #[test]
    fn test_state_mismatch() {
        let slot = AttemptSlot::new();
        slot.begin();
        let url = "octolink://callback?code=abc123&state=forged-state";

        assert_eq!(interpret(url, &slot), RedirectOutcome::StateMismatch);
    }

    #[test]
    fn test_no_pending_attempt_is_mismatch() {
        let slot = AttemptSlot::new();
        let attempt = slot.begin();
        let url = format!("octolink://callback?code=abc123&state={}", attempt.state);
        slot.clear();

        assert_eq!(interpret(&url, &slot), RedirectOutcome::StateMismatch);
    }

    #[test]
    fn test_provider_error_takes_precedence() {
        let slot = AttemptSlot::new();
        let attempt = slot.begin();
        // Even with a valid code+state, error wins
        let url = format!(
            "octolink://callback?error=access_denied&error_description=User%20denied%20access&code=x&state={}",
            attempt.state
        );

        assert_eq!(
            interpret(&url, &slot),
            RedirectOutcome::ProviderError {
                code: "access_denied".to_string(),
                description: Some("User denied access".to_string()),
            }
        );
    }

    #[test]
    fn test_provider_error_without_description() {
        let slot = AttemptSlot::new();
        slot.begin();
        let url = "octolink://callback?error=temporarily_unavailable";

        assert_eq!(
            interpret(url, &slot),
            RedirectOutcome::ProviderError {
                code: "temporarily_unavailable".to_string(),
                description: None,
            }
        );
    }

    #[test]
    fn test_foreign_urls_are_malformed() {
        let slot = AttemptSlot::new();
        let attempt = slot.begin();

        // Wrong scheme
        let url = format!("https://callback?code=x&state={}", attempt.state);
        assert_eq!(interpret(&url, &slot), RedirectOutcome::Malformed);

        // Wrong host
        let url = format!("octolink://other?code=x&state={}", attempt.state);
        assert_eq!(interpret(&url, &slot), RedirectOutcome::Malformed);

        // Ordinary provider page mid-flow
        assert_eq!(
            interpret("https://github.com/login", &slot),
            RedirectOutcome::Malformed
        );

        // Not a URL at all
        assert_eq!(interpret("not a url", &slot), RedirectOutcome::Malformed);
    }

    #[test]
    fn test_missing_parameters_are_malformed() {
        let slot = AttemptSlot::new();
        let attempt = slot.begin();

        assert_eq!(
            interpret("octolink://callback", &slot),
            RedirectOutcome::Malformed
        );
        assert_eq!(
            interpret("octolink://callback?code=abc123", &slot),
            RedirectOutcome::Malformed
        );
        let url = format!("octolink://callback?state={}", attempt.state);
        assert_eq!(interpret(&url, &slot), RedirectOutcome::Malformed);
    }
}
