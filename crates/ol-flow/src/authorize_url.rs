//! Authorization URL construction

use crate::attempt::AuthorizationAttempt;
use crate::config::ProviderConfig;

/// Build the provider authorization URL for an attempt.
///
/// Pure string construction; the state and challenge come from the attempt
/// that the caller already began. The state is never regenerated here — the
/// URL's `state` parameter must be the exact value the slot will validate
/// the callback against.
pub fn build_authorization_url(attempt: &AuthorizationAttempt, config: &ProviderConfig) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&code_challenge={}&code_challenge_method={}",
        config.authorization_endpoint,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(&config.scope),
        urlencoding::encode(&attempt.state),
        urlencoding::encode(&attempt.pkce.challenge),
        urlencoding::encode(&attempt.pkce.method),
    )
}
