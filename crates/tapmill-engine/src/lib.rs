//! # tapmill-engine
//!
//! The decision-making core of Tapmill: everything with state or logic
//! lives here, behind the two seams `tapmill-client` defines.
//!
//! - [`retry`] — uniform fixed-delay backoff around every remote call
//! - [`session`] — credential acquisition and the login exchange
//! - [`ledger`] — pure batch sizing and depletion decisions
//! - [`boost`] — pure energy-bonus eligibility
//! - [`state`] — pure per-cycle state machine
//! - [`worker`] — the action cycle loop driving all of the above

pub mod boost;
pub mod ledger;
pub mod retry;
pub mod session;
pub mod state;
pub mod worker;

pub use retry::absorb;
pub use state::{transition, CycleEvent, CycleState};
pub use worker::Worker;
