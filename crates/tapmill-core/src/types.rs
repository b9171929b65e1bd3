//! Wire-level data model for the game backend and the auth handshake

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the user's game state, as returned by `GET /user/balance`
/// and embedded in the login response.
///
/// The backend is the single source of truth: the worker always re-reads
/// this after an action and never mutates it locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub coins_balance: u64,
    pub current_energy: u64,
    pub energy_limit: u64,
    pub coins_per_click: u64,
    /// Tri-state on purpose: only an explicit `false` from the backend
    /// means onboarding is pending; a missing field means unknown
    pub is_completed_navigation_onboarding: Option<bool>,
}

/// Response of the `POST /game/start` login exchange: a bearer token plus
/// the initial user state.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub state: UserState,
}

/// Daily energy bonus availability, queried fresh every cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostStatus {
    /// Bonus uses left today
    pub remaining: u32,
    /// Seconds until the bonus can be used again (0 = usable now)
    pub seconds_to_next_use: u64,
}

impl BoostStatus {
    /// The bonus itself is usable (ignores energy level and config flags)
    pub fn is_ready(&self) -> bool {
        self.remaining > 0 && self.seconds_to_next_use == 0
    }
}

/// Signed authentication payload extracted from the web-view callback URL.
///
/// This is the time-limited credential: valid for one hour from `auth_date`,
/// replaced wholesale on refresh, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    pub query_id: String,
    pub user: String,
    pub auth_date: i64,
    pub signature: String,
    pub hash: String,
}

impl AuthPayload {
    /// Wall-clock time this credential was issued
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.auth_date, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_state_deserializes_backend_json() {
        let json = r#"{
            "coinsBalance": 10250,
            "currentEnergy": 80,
            "energyLimit": 1000,
            "coinsPerClick": 2,
            "isCompletedNavigationOnboarding": true
        }"#;

        let state: UserState = serde_json::from_str(json).unwrap();
        assert_eq!(state.coins_balance, 10250);
        assert_eq!(state.current_energy, 80);
        assert_eq!(state.energy_limit, 1000);
        assert_eq!(state.coins_per_click, 2);
        assert_eq!(state.is_completed_navigation_onboarding, Some(true));
    }

    #[test]
    fn test_user_state_onboarding_absent_is_unknown() {
        let json = r#"{
            "coinsBalance": 0,
            "currentEnergy": 1000,
            "energyLimit": 1000,
            "coinsPerClick": 1
        }"#;

        let state: UserState = serde_json::from_str(json).unwrap();
        assert_eq!(state.is_completed_navigation_onboarding, None);
    }

    #[test]
    fn test_login_response_flattens_state() {
        let json = r#"{
            "token": "abc.def.ghi",
            "coinsBalance": 500,
            "currentEnergy": 900,
            "energyLimit": 1000,
            "coinsPerClick": 3,
            "isCompletedNavigationOnboarding": false
        }"#;

        let login: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(login.token, "abc.def.ghi");
        assert_eq!(login.state.coins_balance, 500);
        assert_eq!(login.state.is_completed_navigation_onboarding, Some(false));
    }

    #[test]
    fn test_boost_status_readiness() {
        let ready = BoostStatus {
            remaining: 2,
            seconds_to_next_use: 0,
        };
        assert!(ready.is_ready());

        let exhausted = BoostStatus {
            remaining: 0,
            seconds_to_next_use: 0,
        };
        assert!(!exhausted.is_ready());

        let cooling = BoostStatus {
            remaining: 1,
            seconds_to_next_use: 3600,
        };
        assert!(!cooling.is_ready());
    }

    #[test]
    fn test_auth_payload_issued_at() {
        let payload = AuthPayload {
            query_id: "AAF".to_string(),
            user: "{\"id\":1}".to_string(),
            auth_date: 1_700_000_000,
            signature: "sig".to_string(),
            hash: "hash".to_string(),
        };
        let issued = payload.issued_at().unwrap();
        assert_eq!(issued.timestamp(), 1_700_000_000);
    }
}
