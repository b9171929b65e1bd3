//! Unified error types for Tapmill

use thiserror::Error;

/// Unified error type for all Tapmill operations
#[derive(Error, Debug)]
pub enum TapError {
    /// Credential permanently rejected (unauthorized/deactivated account).
    /// Fatal for the identity: terminates its worker, never retried.
    #[error("invalid session for identity '{0}'")]
    InvalidSession(String),

    /// Messaging platform asked us to wait the given number of seconds
    #[error("rate limited for {0}s")]
    RateLimited(u64),

    // Messaging platform errors
    #[error("messenger error: {0}")]
    Messenger(String),

    #[error("auth payload error: {0}")]
    AuthPayload(String),

    // Game backend errors
    #[error("backend request failed: {0}")]
    Backend(String),

    #[error("backend returned status {status}: {body}")]
    BackendStatus { status: u16, body: String },

    // Configuration errors
    #[error("config error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

impl TapError {
    /// Whether this error must terminate the identity's worker (never retried)
    pub fn is_fatal(&self) -> bool {
        matches!(self, TapError::InvalidSession(_))
    }
}

/// Result type alias using TapError
pub type Result<T> = std::result::Result<T, TapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_session_is_fatal() {
        assert!(TapError::InvalidSession("acct1".to_string()).is_fatal());
        assert!(!TapError::Backend("timeout".to_string()).is_fatal());
        assert!(!TapError::RateLimited(12).is_fatal());
        assert!(!TapError::AuthPayload("missing hash".to_string()).is_fatal());
    }

    #[test]
    fn test_display_carries_identity() {
        let err = TapError::InvalidSession("acct1".to_string());
        assert!(err.to_string().contains("acct1"));
    }
}
