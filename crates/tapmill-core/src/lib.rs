//! # tapmill-core
//!
//! Shared types for the Tapmill clicker worker.
//!
//! Tapmill drives one automated game session per identity: it exchanges a
//! messaging-platform credential for a backend bearer token, then submits
//! batched taps against an energy-budgeted balance, topping energy up via
//! the daily bonus when it runs low.
//!
//! This crate holds what every other crate needs:
//!
//! - The unified [`TapError`] type and [`Result`] alias
//! - The [`TapConfig`] loaded from `tapmill.toml`
//! - The wire-level data model ([`UserState`], [`BoostStatus`], ...)

mod config;
mod error;
mod types;

pub use config::{IdentityConfig, TapConfig};
pub use error::{Result, TapError};
pub use types::*;
