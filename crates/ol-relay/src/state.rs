//! Shared state for relay routes

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::exchange::CodeExchangeRelay;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub exchanger: Arc<CodeExchangeRelay>,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Result<Self, crate::exchange::ExchangeError> {
        let exchanger = CodeExchangeRelay::new(config.clone())?;
        Ok(Self {
            config: Arc::new(config),
            exchanger: Arc::new(exchanger),
        })
    }
}
