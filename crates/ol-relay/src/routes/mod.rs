//! HTTP surface of the relay

mod callback;
mod health;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use callback::oauth_callback;
pub use health::{health, test_banner};

/// Build the relay router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/oauth/callback", get(oauth_callback))
        .route("/health", get(health))
        .route("/test", get(test_banner))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
