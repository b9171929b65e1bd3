//! # tapmill-client
//!
//! The two external collaborators of the Tapmill engine:
//!
//! - [`Messenger`] — the messaging-platform seam that yields a signed
//!   web-view callback URL (plus [`StaticMessenger`], which replays a
//!   captured one)
//! - [`GameBackend`] — the clicker backend HTTP API, implemented by
//!   [`BackendClient`] over reqwest
//!
//! [`auth::parse_callback_url`] turns a callback URL into the typed
//! [`tapmill_core::AuthPayload`] the login exchange needs.

pub mod auth;
mod backend;
mod messenger;

pub use auth::parse_callback_url;
pub use backend::{BackendClient, GameBackend, DEFAULT_BASE_URL};
pub use messenger::{Messenger, MessengerError, PeerId, StaticMessenger};
