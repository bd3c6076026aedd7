//! Confidential code-exchange relay
//!
//! The relay is the confidential client: it holds the OAuth client secret,
//! receives the provider callback on its own registered redirect URI,
//! performs the server-to-server code exchange and bounces the end-user
//! client back to the app scheme with either a token or an error. The
//! secret never reaches the public client in `ol-flow`.

pub mod config;
pub mod exchange;
pub mod routes;
pub mod state;

pub use config::RelayConfig;
pub use exchange::{CodeExchangeRelay, ExchangeError};
pub use routes::router;
pub use state::AppState;
