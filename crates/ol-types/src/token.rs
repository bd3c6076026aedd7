//! Access-token types shared between the flow engine and the relay

use serde::{Deserialize, Serialize};

/// Access token obtained from a completed code exchange.
///
/// The core never persists this; the caller hands it to whatever
/// token storage it owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResult {
    /// The access token itself
    pub access_token: String,

    /// Token type, "Bearer" unless the provider says otherwise
    pub token_type: String,

    /// Granted scope, empty when the provider omits it
    pub scope: String,
}

impl TokenResult {
    /// Truncated form safe for logs. Never log the full token.
    pub fn redacted(&self) -> String {
        let head: String = self.access_token.chars().take(10).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_truncates() {
        let token = TokenResult {
            access_token: "gho_abcdefghijklmnop".to_string(),
            token_type: "Bearer".to_string(),
            scope: "read:user".to_string(),
        };
        assert_eq!(token.redacted(), "gho_abcdef...");
    }

    #[test]
    fn test_redacted_short_token() {
        let token = TokenResult {
            access_token: "abc".to_string(),
            token_type: "Bearer".to_string(),
            scope: String::new(),
        };
        assert_eq!(token.redacted(), "abc...");
    }
}
