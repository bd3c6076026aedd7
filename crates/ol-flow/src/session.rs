//! Login session controller
//!
//! Drives one interactive login from `begin_login` through callback
//! interception to the background code exchange. The session owns the
//! single attempt slot; the host's browser view feeds every navigation
//! target into [`LoginSession::handle_navigation`] and intercepts the ones
//! this returns [`Navigation::Intercepted`] for.
//!
//! The exchange runs as a spawned tokio task. Its completion is applied
//! only if the session generation still matches the one the task was
//! started under; a result arriving after `cancel()` or a new
//! `begin_login()` is discarded, never applied to the defunct attempt.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, warn};
use url::Url;

use ol_types::{AppResult, TokenResult};

use crate::attempt::AttemptSlot;
use crate::authorize_url::build_authorization_url;
use crate::config::ProviderConfig;
use crate::exchanger::CodeExchanger;
use crate::redirect::{interpret_redirect, RedirectOutcome};
use crate::storage::{TokenStorage, ACCESS_TOKEN_KEY};

/// What the hosting browser view should do with a navigation target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The URL belongs to this flow; do not navigate, the session took it
    Intercepted,

    /// Not ours; let the page load normally
    PassThrough,
}

/// Observable session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No login in progress
    Idle,

    /// Authorization URL issued, waiting for the provider to call back
    AwaitingCallback,

    /// Code received and validated, exchange in flight
    ExchangingToken,

    /// Token obtained and handed to storage
    Completed,

    /// Terminal failure, with the raw error code and optional detail
    Failed {
        error: String,
        description: Option<String>,
    },

    /// Cancelled by the caller
    Cancelled,
}

struct SessionInner {
    status: SessionStatus,
    /// Bumped on every begin/cancel; a background exchange result is only
    /// applied when its captured generation still matches.
    generation: u64,
}

/// One-at-a-time interactive login controller
pub struct LoginSession {
    config: ProviderConfig,
    slot: Arc<AttemptSlot>,
    exchanger: Arc<dyn CodeExchanger>,
    storage: Arc<dyn TokenStorage>,
    inner: Arc<RwLock<SessionInner>>,
}

impl LoginSession {
    pub fn new(
        config: ProviderConfig,
        exchanger: Arc<dyn CodeExchanger>,
        storage: Arc<dyn TokenStorage>,
    ) -> Self {
        Self {
            config,
            slot: Arc::new(AttemptSlot::new()),
            exchanger,
            storage,
            inner: Arc::new(RwLock::new(SessionInner {
                status: SessionStatus::Idle,
                generation: 0,
            })),
        }
    }

    /// Begin a login attempt and return the authorization URL to load.
    ///
    /// Replaces any outstanding attempt; a callback for the old attempt can
    /// no longer validate.
    pub fn begin_login(&self) -> String {
        let attempt = self.slot.begin();
        {
            let mut inner = self.inner.write();
            inner.generation += 1;
            inner.status = SessionStatus::AwaitingCallback;
        }
        info!("Login started, awaiting provider callback");
        build_authorization_url(&attempt, &self.config)
    }

    /// Feed one navigated URL through the flow.
    ///
    /// Foreign URLs pass through untouched. For our callback scheme/host the
    /// deep link is processed in the same order the callback can carry data:
    /// provider error, direct token delivery from the relay, then code+state.
    pub fn handle_navigation(&self, navigated_url: &str) -> Navigation {
        if !self.is_our_callback(navigated_url) {
            return Navigation::PassThrough;
        }

        match interpret_redirect(
            navigated_url,
            &self.config.callback_scheme,
            &self.config.callback_host,
            &self.slot,
        ) {
            RedirectOutcome::ProviderError { code, description } => {
                warn!("Provider returned error: {}", code);
                self.slot.clear();
                self.fail(code, description);
            }
            RedirectOutcome::StateMismatch => {
                // Possible CSRF. Never proceed to exchange; reported
                // distinctly from a provider error.
                error!("Callback state does not match the pending attempt");
                self.slot.clear();
                self.fail(
                    "invalid_state".to_string(),
                    Some("State verification failed".to_string()),
                );
            }
            RedirectOutcome::Success { code, .. } => {
                // One exchange per code: drop the attempt before the
                // exchange so a duplicate callback cannot revalidate.
                self.slot.clear();
                self.start_exchange(code);
            }
            RedirectOutcome::Malformed => {
                // Ours but carrying neither error nor code+state. The relay
                // redirects with the token directly; check for that before
                // ignoring the navigation.
                if let Some((token, token_type)) = extract_direct_token(navigated_url) {
                    self.complete_with_token(TokenResult {
                        access_token: token,
                        token_type,
                        scope: String::new(),
                    });
                } else {
                    debug!("Ignoring callback navigation without flow parameters");
                }
            }
        }

        Navigation::Intercepted
    }

    /// Current status snapshot.
    pub fn status(&self) -> SessionStatus {
        self.inner.read().status.clone()
    }

    /// Stored access token, if a login completed.
    pub fn access_token(&self) -> AppResult<Option<String>> {
        self.storage.get(ACCESS_TOKEN_KEY)
    }

    /// Abandon the current login. Repeated cancel is a no-op.
    ///
    /// An in-flight exchange is allowed to finish but its result will be
    /// discarded by the generation check.
    pub fn cancel(&self) {
        let mut inner = self.inner.write();
        if inner.status == SessionStatus::Cancelled {
            return;
        }
        info!("Login cancelled");
        inner.generation += 1;
        inner.status = SessionStatus::Cancelled;
        self.slot.clear();
    }

    /// Forget the stored token and reset to idle.
    pub fn logout(&self) -> AppResult<()> {
        self.storage.clear()?;
        self.slot.clear();
        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.status = SessionStatus::Idle;
        Ok(())
    }

    fn is_our_callback(&self, navigated_url: &str) -> bool {
        match Url::parse(navigated_url) {
            Ok(url) => {
                url.scheme() == self.config.callback_scheme
                    && url.host_str() == Some(self.config.callback_host.as_str())
            }
            Err(_) => false,
        }
    }

    fn fail(&self, error: String, description: Option<String>) {
        self.inner.write().status = SessionStatus::Failed { error, description };
    }

    fn complete_with_token(&self, token: TokenResult) {
        info!("Token delivered directly by relay: {}", token.redacted());
        self.slot.clear();
        match self.storage.put(ACCESS_TOKEN_KEY, &token.access_token) {
            Ok(()) => self.inner.write().status = SessionStatus::Completed,
            Err(e) => {
                error!("Failed to store token: {}", e);
                self.fail("storage_error".to_string(), Some(e.to_string()));
            }
        }
    }

    /// Spawn the code exchange and apply its result if still relevant.
    fn start_exchange(&self, code: String) {
        let generation = {
            let mut inner = self.inner.write();
            inner.status = SessionStatus::ExchangingToken;
            inner.generation
        };
        info!("Authorization code validated, exchanging via relay");

        let exchanger = Arc::clone(&self.exchanger);
        let storage = Arc::clone(&self.storage);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let result = exchanger.exchange(&code).await;

            let mut inner = inner.write();
            if inner.generation != generation
                || inner.status != SessionStatus::ExchangingToken
            {
                // Session moved on (cancelled or restarted) while the
                // exchange was in flight.
                debug!("Discarding late exchange result");
                return;
            }

            match result {
                Ok(token) => {
                    info!("Exchange completed: {}", token.redacted());
                    match storage.put(ACCESS_TOKEN_KEY, &token.access_token) {
                        Ok(()) => inner.status = SessionStatus::Completed,
                        Err(e) => {
                            error!("Failed to store token: {}", e);
                            inner.status = SessionStatus::Failed {
                                error: "storage_error".to_string(),
                                description: Some(e.to_string()),
                            };
                        }
                    }
                }
                Err(e) => {
                    error!("Exchange failed: {}", e);
                    inner.status = SessionStatus::Failed {
                        error: "exchange_failed".to_string(),
                        description: Some(e.to_string()),
                    };
                }
            }
        });
    }
}

/// Direct `token=`/`token_type=` delivery on the app scheme.
fn extract_direct_token(navigated_url: &str) -> Option<(String, String)> {
    let url = Url::parse(navigated_url).ok()?;
    let mut token = None;
    let mut token_type = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "token" => token = Some(value.into_owned()),
            "token_type" => token_type = Some(value.into_owned()),
            _ => {}
        }
    }
    token.map(|t| (t, token_type.unwrap_or_else(|| "Bearer".to_string())))
}
