//! Provider callback endpoint
//!
//! `GET /oauth/callback` receives the provider redirect, performs the code
//! exchange and bounces the end-user client to the app scheme with either
//! `token=&token_type=` or `error=&error_description=`. Every value placed
//! in the redirect is percent-encoded; provider-supplied descriptions are
//! never passed through raw.

use axum::extract::{Query, State};
use axum::response::Redirect;
use serde::Deserialize;
use tracing::{info, warn};

use crate::exchange::ExchangeError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Build an app-scheme redirect URL from encoded key/value pairs.
fn app_redirect(base: &str, pairs: &[(&str, &str)]) -> Redirect {
    let query: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect();
    Redirect::temporary(&format!("{}?{}", base, query.join("&")))
}

fn error_redirect(base: &str, error: &str, description: Option<&str>) -> Redirect {
    match description {
        Some(description) => app_redirect(
            base,
            &[("error", error), ("error_description", description)],
        ),
        None => app_redirect(base, &[("error", error)]),
    }
}

pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let app_uri = &state.config.app_redirect_uri;

    let code_head: String = params
        .code
        .as_deref()
        .map(|c| c.chars().take(10).collect())
        .unwrap_or_else(|| "-".to_string());
    info!(
        "OAuth callback received (code: {}..., state: {}, error: {})",
        code_head,
        params.state.as_deref().unwrap_or("-"),
        params.error.as_deref().unwrap_or("-"),
    );

    // Provider-reported error wins over everything else in the callback.
    if let Some(error) = params.error {
        warn!("Provider callback carried error: {}", error);
        return error_redirect(app_uri, &error, params.error_description.as_deref());
    }

    let Some(code) = params.code else {
        warn!("Provider callback carried no authorization code");
        return error_redirect(app_uri, "no_code", None);
    };

    match state.exchanger.exchange(&code).await {
        Ok(token) => {
            info!("Redirecting client with token {}", token.redacted());
            if token.scope.is_empty() {
                app_redirect(
                    app_uri,
                    &[
                        ("token", &token.access_token),
                        ("token_type", &token.token_type),
                    ],
                )
            } else {
                app_redirect(
                    app_uri,
                    &[
                        ("token", &token.access_token),
                        ("token_type", &token.token_type),
                        ("scope", &token.scope),
                    ],
                )
            }
        }
        Err(ExchangeError::ProviderToken { code, description }) => {
            error_redirect(app_uri, &code, description.as_deref())
        }
        Err(ExchangeError::MissingToken) => error_redirect(app_uri, "no_token", None),
        Err(ExchangeError::Transport(message)) => {
            error_redirect(app_uri, "server_error", Some(&message))
        }
    }
}
