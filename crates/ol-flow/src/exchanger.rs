//! Code exchange through the relay backend
//!
//! The public client never holds the client secret, so it cannot talk to
//! the token endpoint itself. It hands the authorization code to the relay
//! and reads the token out of the app-scheme redirect the relay answers
//! with. The trait seam lets tests substitute a stub exchanger.

use async_trait::async_trait;
use ol_types::{AppError, AppResult, TokenResult};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default connect/read timeout for the relay call.
const RELAY_TIMEOUT_SECS: u64 = 10;

/// Exchanges a validated authorization code for an access token
#[async_trait]
pub trait CodeExchanger: Send + Sync {
    async fn exchange(&self, code: &str) -> AppResult<TokenResult>;
}

/// Exchanger backed by the Octolink relay
pub struct RelayExchanger {
    client: reqwest::Client,
    base_url: String,
}

impl RelayExchanger {
    /// Create an exchanger for a relay at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        // The relay answers with a redirect to the app scheme; reqwest must
        // not try to follow it.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(RELAY_TIMEOUT_SECS))
            .timeout(Duration::from_secs(RELAY_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Flow(format!("Failed to build relay client: {}", e)))?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Pull token or error out of the app-scheme redirect URL.
    fn parse_app_redirect(target: &str) -> AppResult<TokenResult> {
        let url = Url::parse(target.trim())
            .map_err(|e| AppError::Flow(format!("Relay returned an unparseable redirect: {}", e)))?;

        let mut token = None;
        let mut token_type = None;
        let mut scope = None;
        let mut error = None;
        let mut error_description = None;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "token" => token = Some(value.into_owned()),
                "token_type" => token_type = Some(value.into_owned()),
                "scope" => scope = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "error_description" => error_description = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = error {
            return Err(AppError::Flow(format!(
                "Relay reported {}: {}",
                error,
                error_description.unwrap_or_default()
            )));
        }

        let access_token =
            token.ok_or_else(|| AppError::Flow("Relay redirect carried no token".to_string()))?;

        Ok(TokenResult {
            access_token,
            token_type: token_type.unwrap_or_else(|| "Bearer".to_string()),
            scope: scope.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl CodeExchanger for RelayExchanger {
    async fn exchange(&self, code: &str) -> AppResult<TokenResult> {
        let url = format!(
            "{}/oauth/callback?code={}",
            self.base_url,
            urlencoding::encode(code)
        );
        debug!("Sending authorization code to relay");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Flow(format!("Relay unreachable: {}", e)))?;

        let status = response.status();
        let target = if status.is_redirection() {
            response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::Flow("Relay redirect had no Location header".to_string())
                })?
        } else if status.is_success() {
            // Some deployments sit behind proxies that flatten the redirect
            // into a body containing the target URL.
            response
                .text()
                .await
                .map_err(|e| AppError::Flow(format!("Failed to read relay response: {}", e)))?
        } else {
            return Err(AppError::Flow(format!(
                "Relay returned HTTP {}",
                status.as_u16()
            )));
        };

        let token = Self::parse_app_redirect(&target)?;
        info!("Token received from relay: {}", token.redacted());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_redirect_with_token() {
        let token = RelayExchanger::parse_app_redirect(
            "octolink://callback?token=tok_xyz&token_type=Bearer&scope=read%3Auser",
        )
        .unwrap();
        assert_eq!(token.access_token, "tok_xyz");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.scope, "read:user");
    }

    #[test]
    fn test_parse_redirect_defaults() {
        let token = RelayExchanger::parse_app_redirect("octolink://callback?token=tok_xyz").unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.scope, "");
    }

    #[test]
    fn test_parse_redirect_with_error() {
        let err = RelayExchanger::parse_app_redirect(
            "octolink://callback?error=bad_verification_code&error_description=expired",
        )
        .unwrap_err();
        assert!(err.to_string().contains("bad_verification_code"));
    }

    #[test]
    fn test_parse_redirect_without_token_or_error() {
        assert!(RelayExchanger::parse_app_redirect("octolink://callback").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let exchanger = RelayExchanger::new("http://localhost:3000/").unwrap();
        assert_eq!(exchanger.base_url, "http://localhost:3000");
    }
}
