//! Client-side provider configuration
//!
//! The public client never holds the client secret; that stays in the relay
//! (`ol-relay`). This struct carries only what the authorization URL and the
//! callback interception need.

use serde::{Deserialize, Serialize};

/// Static identity-provider configuration, immutable for the process lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Authorization endpoint, e.g. `https://github.com/login/oauth/authorize`
    pub authorization_endpoint: String,

    /// OAuth client id (public)
    pub client_id: String,

    /// Redirect URI registered with the provider, e.g. `octolink://callback`
    pub redirect_uri: String,

    /// Space-separated scope string
    pub scope: String,

    /// Scheme of the callback deep link we intercept
    pub callback_scheme: String,

    /// Host of the callback deep link we intercept
    pub callback_host: String,
}

impl ProviderConfig {
    /// GitHub configuration with the app's deep-link callback.
    pub fn github(client_id: impl Into<String>) -> Self {
        Self {
            authorization_endpoint: "https://github.com/login/oauth/authorize".to_string(),
            client_id: client_id.into(),
            redirect_uri: "octolink://callback".to_string(),
            scope: "user read:user".to_string(),
            callback_scheme: "octolink".to_string(),
            callback_host: "callback".to_string(),
        }
    }
}
