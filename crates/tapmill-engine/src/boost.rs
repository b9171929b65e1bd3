//! Boost controller: daily energy bonus eligibility
//!
//! Pure predicate; the worker handles the pacing sleeps and the apply call.

use tapmill_core::BoostStatus;

/// Whether the daily energy bonus should be applied right now.
///
/// All four must hold simultaneously: uses remain, the cool-down has
/// expired, energy is below the configured minimum, and auto-apply is on.
pub fn should_apply(
    status: &BoostStatus,
    current_energy: u64,
    min_available_energy: u64,
    auto_apply: bool,
) -> bool {
    status.remaining > 0
        && status.seconds_to_next_use == 0
        && current_energy < min_available_energy
        && auto_apply
}
