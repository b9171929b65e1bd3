//! Messaging-platform seam
//!
//! The engine only needs four operations from the platform: connect,
//! disconnect, peer resolution and the in-chat web-view launch that returns
//! a signed callback URL. Everything behind those (MTProto, session files,
//! transport) stays outside this workspace; a real wire client implements
//! [`Messenger`], and so does the [`StaticMessenger`] the CLI ships.

use async_trait::async_trait;
use thiserror::Error;

/// Faults the platform can raise, in the granularity the engine cares about
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessengerError {
    /// Credential rejected; the account can never log in again without
    /// manual intervention
    #[error("unauthorized")]
    Unauthorized,

    /// Account deactivated by the platform
    #[error("account deactivated")]
    Deactivated,

    /// Platform demands a wait of this many seconds before retrying
    #[error("flood wait: {0}s")]
    FloodWait(u64),

    /// Anything else (transport, protocol, parse)
    #[error("platform error: {0}")]
    Protocol(String),
}

impl MessengerError {
    /// Errors that permanently invalidate the identity's credential
    pub fn is_fatal(&self) -> bool {
        matches!(self, MessengerError::Unauthorized | MessengerError::Deactivated)
    }
}

/// Resolved platform peer (the game's bot identity)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerId(pub String);

/// Minimal messaging-platform interface the session provider runs against
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Whether a live connection already exists
    fn is_connected(&self) -> bool;

    async fn connect(&mut self) -> Result<(), MessengerError>;

    async fn disconnect(&mut self) -> Result<(), MessengerError>;

    /// Resolve the bot/service identity to talk to
    async fn resolve_peer(&self, name: &str) -> Result<PeerId, MessengerError>;

    /// Launch the in-chat web app and return the signed callback URL
    async fn request_web_view(
        &self,
        peer: &PeerId,
        platform: &str,
        url: &str,
    ) -> Result<String, MessengerError>;
}

/// Messenger that replays a pre-captured callback URL.
///
/// This is how the CLI supplies credentials without embedding a wire
/// client, and the test double for the engine.
#[derive(Debug, Clone)]
pub struct StaticMessenger {
    callback_url: String,
    connected: bool,
}

impl StaticMessenger {
    pub fn new(callback_url: impl Into<String>) -> Self {
        Self {
            callback_url: callback_url.into(),
            connected: false,
        }
    }
}

#[async_trait]
impl Messenger for StaticMessenger {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), MessengerError> {
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), MessengerError> {
        self.connected = false;
        Ok(())
    }

    async fn resolve_peer(&self, name: &str) -> Result<PeerId, MessengerError> {
        if !self.connected {
            return Err(MessengerError::Protocol("not connected".to_string()));
        }
        Ok(PeerId(name.to_string()))
    }

    async fn request_web_view(
        &self,
        _peer: &PeerId,
        _platform: &str,
        _url: &str,
    ) -> Result<String, MessengerError> {
        if !self.connected {
            return Err(MessengerError::Protocol("not connected".to_string()));
        }
        Ok(self.callback_url.clone())
    }
}
