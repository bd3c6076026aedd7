//! Relay configuration
//!
//! Loaded once at startup from `OCTOLINK_*` environment variables; immutable
//! for the process lifetime. This is the only place the client secret lives.

use ol_types::{AppError, AppResult};
use std::env;

/// Default listen port, overridable via `PORT`.
const DEFAULT_PORT: u16 = 3000;

/// Default connect/read timeout for the token endpoint call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// OAuth client id
    pub client_id: String,

    /// OAuth client secret (confidential; never logged, never relayed)
    pub client_secret: String,

    /// Provider token endpoint
    pub token_endpoint: String,

    /// The relay's own registered redirect URI (what the provider calls)
    pub backend_redirect_uri: String,

    /// The end-user app's deep-link redirect (where we bounce results to)
    pub app_redirect_uri: String,

    /// Listen port
    pub port: u16,

    /// Connect timeout for the token endpoint call, seconds
    pub connect_timeout_secs: u64,

    /// Read timeout for the token endpoint call, seconds
    pub read_timeout_secs: u64,
}

fn env_or(name: &str, default: impl Into<String>) -> String {
    env::var(name).unwrap_or_else(|_| default.into())
}

fn required(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Config(format!("{} must be set", name)))
}

impl RelayConfig {
    /// Load configuration from the environment.
    ///
    /// `OCTOLINK_CLIENT_ID` and `OCTOLINK_CLIENT_SECRET` are required;
    /// everything else has GitHub-flavored defaults.
    pub fn from_env() -> AppResult<Self> {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            client_id: required("OCTOLINK_CLIENT_ID")?,
            client_secret: required("OCTOLINK_CLIENT_SECRET")?,
            token_endpoint: env_or(
                "OCTOLINK_TOKEN_ENDPOINT",
                "https://github.com/login/oauth/access_token",
            ),
            backend_redirect_uri: env_or(
                "OCTOLINK_BACKEND_REDIRECT_URI",
                format!("http://localhost:{}/oauth/callback", port),
            ),
            app_redirect_uri: env_or("OCTOLINK_APP_REDIRECT_URI", "octolink://callback"),
            port,
            connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }
}
