//! Client-side OAuth 2.0 Authorization Code flow with PKCE
//!
//! This crate implements the public-client half of the flow:
//! - PKCE verifier/challenge generation (RFC 7636, S256)
//! - CSRF state generation and single-slot attempt tracking
//! - Authorization URL construction
//! - Redirect callback classification and validation
//! - A login-session controller that drives the whole sequence and hands
//!   the authorization code to a relay for the confidential exchange
//!
//! The confidential half (client secret, token endpoint) lives in `ol-relay`.

pub mod attempt;
pub mod authorize_url;
pub mod config;
pub mod exchanger;
pub mod pkce;
pub mod redirect;
pub mod session;
pub mod storage;

// Re-export public API
pub use attempt::{generate_state, AttemptSlot, AuthorizationAttempt};
pub use authorize_url::build_authorization_url;
pub use config::ProviderConfig;
pub use exchanger::{CodeExchanger, RelayExchanger};
pub use pkce::{derive_challenge, generate_pkce_pair, verify_challenge, PkcePair};
pub use redirect::{interpret_redirect, RedirectOutcome};
pub use session::{LoginSession, Navigation, SessionStatus};
pub use storage::{MemoryTokenStorage, TokenStorage, ACCESS_TOKEN_KEY};
