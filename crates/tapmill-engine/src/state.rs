//! Pure per-cycle state machine for the action loop
//!
//! No I/O, no async, no dependencies on the rest of the engine. The worker
//! drives this with events as its cycle progresses; tests exercise it
//! directly. Invalid transitions land in the terminal `Invalid` state with
//! a descriptive reason; this function never panics.

/// Where the worker is within its cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleState {
    /// No usable session token (startup, or the hourly TTL elapsed)
    NeedsLogin,
    /// Fresh token in hand, ready to act
    Authenticated,
    /// A tap batch was submitted this cycle
    Acting,
    /// The energy bonus was applied this cycle
    Boosting,
    /// Energy depleted; waiting out the long cool-down
    Resting,
    /// Credential permanently rejected. Terminal.
    Invalid { reason: String },
}

/// Events the worker feeds in as its cycle progresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    /// Login exchange succeeded
    LoggedIn,
    /// Session token aged past its TTL
    TokenExpired,
    /// A tap batch went out
    BatchSubmitted,
    /// Energy bonus applied
    BoostApplied,
    /// Post-action energy fell below the configured minimum
    EnergyDepleted,
    /// Cycle finished its sleep; ready for the next iteration
    CyclePaced,
    /// Credential permanently rejected by the platform
    SessionRejected { reason: String },
}

/// Pure state transition function.
///
/// `SessionRejected` forces `Invalid` from any state; `Invalid` rejects
/// everything else and stays terminal.
pub fn transition(state: CycleState, event: CycleEvent) -> CycleState {
    match (state, event) {
        // Fatal rejection wins from any non-terminal state
        (CycleState::Invalid { reason }, _) => CycleState::Invalid { reason },
        (_, CycleEvent::SessionRejected { reason }) => CycleState::Invalid { reason },

        (CycleState::NeedsLogin, CycleEvent::LoggedIn) => CycleState::Authenticated,
        // Still unauthenticated after a swallowed login fault
        (CycleState::NeedsLogin, CycleEvent::CyclePaced) => CycleState::NeedsLogin,

        (CycleState::Authenticated, CycleEvent::TokenExpired) => CycleState::NeedsLogin,
        (CycleState::Authenticated, CycleEvent::BatchSubmitted) => CycleState::Acting,
        // A cycle can end without acting (empty-result no-op)
        (CycleState::Authenticated, CycleEvent::CyclePaced) => CycleState::Authenticated,

        (CycleState::Acting, CycleEvent::BoostApplied) => CycleState::Boosting,
        (CycleState::Acting, CycleEvent::EnergyDepleted) => CycleState::Resting,
        (CycleState::Acting, CycleEvent::CyclePaced) => CycleState::Authenticated,

        (CycleState::Boosting, CycleEvent::CyclePaced) => CycleState::Authenticated,
        (CycleState::Resting, CycleEvent::CyclePaced) => CycleState::Authenticated,

        (state, event) => CycleState::Invalid {
            reason: format!("invalid transition: {:?} cannot handle {:?}", state, event),
        },
    }
}

impl CycleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CycleState::Invalid { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected() -> CycleEvent {
        CycleEvent::SessionRejected {
            reason: "unauthorized".to_string(),
        }
    }

    #[test]
    fn test_happy_path_acting_cycle() {
        let state = transition(CycleState::NeedsLogin, CycleEvent::LoggedIn);
        assert_eq!(state, CycleState::Authenticated);

        let state = transition(state, CycleEvent::BatchSubmitted);
        assert_eq!(state, CycleState::Acting);

        let state = transition(state, CycleEvent::CyclePaced);
        assert_eq!(state, CycleState::Authenticated);
    }

    #[test]
    fn test_boosting_branch() {
        let state = transition(CycleState::Acting, CycleEvent::BoostApplied);
        assert_eq!(state, CycleState::Boosting);
        assert_eq!(
            transition(state, CycleEvent::CyclePaced),
            CycleState::Authenticated
        );
    }

    #[test]
    fn test_resting_branch() {
        let state = transition(CycleState::Acting, CycleEvent::EnergyDepleted);
        assert_eq!(state, CycleState::Resting);
        assert_eq!(
            transition(state, CycleEvent::CyclePaced),
            CycleState::Authenticated
        );
    }

    #[test]
    fn test_token_expiry_returns_to_login() {
        let state = transition(CycleState::Authenticated, CycleEvent::TokenExpired);
        assert_eq!(state, CycleState::NeedsLogin);
    }

    #[test]
    fn test_rejection_is_terminal_from_any_state() {
        for state in [
            CycleState::NeedsLogin,
            CycleState::Authenticated,
            CycleState::Acting,
            CycleState::Boosting,
            CycleState::Resting,
        ] {
            let next = transition(state, rejected());
            assert!(next.is_terminal());
        }
    }

    #[test]
    fn test_invalid_state_rejects_all_events() {
        let invalid = CycleState::Invalid {
            reason: "unauthorized".to_string(),
        };
        let next = transition(invalid.clone(), CycleEvent::LoggedIn);
        assert_eq!(next, invalid);

        let next = transition(invalid.clone(), CycleEvent::CyclePaced);
        assert_eq!(next, invalid);
    }

    #[test]
    fn test_invalid_transition_never_panics() {
        let state = transition(CycleState::Resting, CycleEvent::BatchSubmitted);
        assert!(state.is_terminal());

        let state = transition(CycleState::NeedsLogin, CycleEvent::BoostApplied);
        assert!(state.is_terminal());
    }
}
