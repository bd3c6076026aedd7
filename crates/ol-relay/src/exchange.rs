//! Authorization-code-to-token exchange
//!
//! Server-to-server POST to the provider token endpoint. The relay never
//! retries: an authorization code is single-use at the provider and a blind
//! retry turns into a "code already used" error.

use ol_types::TokenResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::RelayConfig;

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Token endpoint rejected the code (e.g. `bad_verification_code`)
    #[error("Token endpoint rejected the code: {code}")]
    ProviderToken {
        code: String,
        description: Option<String>,
    },

    /// 200 response without an `access_token` field
    #[error("Token endpoint returned no access token")]
    MissingToken,

    /// Network failure, timeout, or non-parseable body
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Token request body, per the provider's JSON token endpoint
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

/// Token endpoint response; either token fields or error fields are present
#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Stateless exchange client; safe for concurrent use across codes
pub struct CodeExchangeRelay {
    client: reqwest::Client,
    config: RelayConfig,
}

impl CodeExchangeRelay {
    pub fn new(config: RelayConfig) -> Result<Self, ExchangeError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .user_agent("Octolink-Relay")
            .build()
            .map_err(|e| ExchangeError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Exchange an authorization code for an access token.
    ///
    /// The redirect URI sent here is the relay's own registered redirect,
    /// not the end-user app's deep link.
    pub async fn exchange(&self, code: &str) -> Result<TokenResult, ExchangeError> {
        let code_head: String = code.chars().take(10).collect();
        info!("Exchanging authorization code {}...", code_head);

        let request = TokenRequest {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            code,
            redirect_uri: &self.config.backend_redirect_uri,
        };

        let response = self
            .client
            .post(&self.config.token_endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(format!("Token request failed: {}", e)))?;

        let status = response.status();
        debug!("Token endpoint responded with HTTP {}", status.as_u16());

        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Transport(format!("Failed to read response: {}", e)))?;

        // GitHub answers errors with HTTP 200 and an `error` field, so the
        // body is parsed before the status is judged.
        let parsed: TokenEndpointResponse = serde_json::from_str(&body).map_err(|e| {
            ExchangeError::Transport(format!(
                "Non-parseable token response (HTTP {}): {}",
                status.as_u16(),
                e
            ))
        })?;

        if let Some(error) = parsed.error {
            error!("Token exchange rejected: {}", error);
            return Err(ExchangeError::ProviderToken {
                code: error,
                description: parsed.error_description,
            });
        }

        let access_token = match parsed.access_token {
            Some(token) if !token.is_empty() => token,
            _ => {
                error!("Token endpoint response carried no access token");
                return Err(ExchangeError::MissingToken);
            }
        };

        let token = TokenResult {
            access_token,
            token_type: parsed.token_type.unwrap_or_else(|| "Bearer".to_string()),
            scope: parsed.scope.unwrap_or_default(),
        };

        info!("Token exchange successful: {}", token.redacted());
        Ok(token)
    }
}
