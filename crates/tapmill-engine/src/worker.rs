//! Action cycle loop
//!
//! One worker per identity, fully independent of its siblings: it owns its
//! messenger, its backend client (and therefore its bearer token) and its
//! stop signal. Within a worker everything is strictly sequential; each
//! remote call and each sleep is a suspension point.
//!
//! The loop never exits on its own. It stops only on the stop signal or on
//! the fatal invalid-session fault; every other fault is absorbed by the
//! backoff executor and the loop carries on.

use crate::boost;
use crate::ledger;
use crate::retry::absorb;
use crate::session;
use crate::state::{transition, CycleEvent, CycleState};
use rand::Rng;
use std::time::Duration;
use tapmill_client::{GameBackend, Messenger};
use tapmill_core::{Result, TapConfig};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Bot identity resolved on the messaging platform
pub const BOT_NAME: &str = "token1win_bot";

/// Web-app URL launched to obtain the signed payload
pub const LAUNCH_URL: &str = "https://frontend.yumify.one/";

/// Pause before applying the energy boost (UX pacing)
const BOOST_PACING: Duration = Duration::from_secs(5);

/// Settle time after a successful boost application
const BOOST_SETTLE: Duration = Duration::from_secs(1);

/// The action cycle loop for one identity
pub struct Worker<M, B> {
    identity: String,
    config: TapConfig,
    messenger: M,
    backend: B,
    stop: watch::Receiver<bool>,
    bot_name: String,
    launch_url: String,
}

impl<M: Messenger, B: GameBackend> Worker<M, B> {
    /// Build a worker, rejecting configs with inverted draw bounds up front
    /// so the per-cycle draws can never panic mid-run.
    pub fn new(
        identity: &str,
        config: TapConfig,
        messenger: M,
        backend: B,
        stop: watch::Receiver<bool>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            identity: identity.to_string(),
            config,
            messenger,
            backend,
            stop,
            bot_name: BOT_NAME.to_string(),
            launch_url: LAUNCH_URL.to_string(),
        })
    }

    /// Override the bot peer and launch URL (tests, alternate deployments)
    pub fn with_target(mut self, bot_name: &str, launch_url: &str) -> Self {
        self.bot_name = bot_name.to_string();
        self.launch_url = launch_url.to_string();
        self
    }

    /// Run until the stop signal or a fatal invalid-session fault
    pub async fn run(mut self) -> Result<()> {
        let run_id = Uuid::new_v4().simple().to_string();
        info!("{} | worker starting (run {})", self.identity, &run_id[..8]);

        let mut state = CycleState::NeedsLogin;
        let result = self.drive(&mut state).await;

        match &result {
            Err(e) => {
                state = transition(
                    state,
                    CycleEvent::SessionRejected {
                        reason: e.to_string(),
                    },
                );
                error!("{} | session invalid, worker terminated: {}", self.identity, e);
                debug!("{} | terminal state: {:?}", self.identity, state);
            }
            Ok(()) => info!("{} | worker stopped", self.identity),
        }

        result
    }

    async fn drive(&mut self, state: &mut CycleState) -> Result<()> {
        let cooldown = Duration::from_secs(self.config.error_cooldown_secs);
        let ttl = Duration::from_secs(self.config.token_ttl_secs);
        let mut token_obtained: Option<Instant> = None;
        let mut previous_balance: Option<u64> = None;

        loop {
            if self.stopped() {
                info!("{} | stop signal received", self.identity);
                return Ok(());
            }

            // 1. Session refresh: on startup and once per TTL thereafter.
            // A stale token is discarded, never retried.
            if needs_refresh(token_obtained, ttl) {
                if !matches!(state, CycleState::NeedsLogin) {
                    debug!("{} | session token expired", self.identity);
                    *state = transition(state.clone(), CycleEvent::TokenExpired);
                }

                let payload = match absorb(
                    &self.identity,
                    "web-app payload",
                    cooldown,
                    session::web_app_payload(
                        &self.identity,
                        &mut self.messenger,
                        &self.bot_name,
                        &self.launch_url,
                    ),
                )
                .await?
                {
                    Some(payload) => payload,
                    None => {
                        self.pace(state).await;
                        continue;
                    }
                };

                let login = match absorb(
                    &self.identity,
                    "login",
                    cooldown,
                    session::login(&self.identity, &mut self.backend, &payload),
                )
                .await?
                {
                    Some(login) => login,
                    None => {
                        self.pace(state).await;
                        continue;
                    }
                };

                token_obtained = Some(Instant::now());
                previous_balance = Some(login.state.coins_balance);
                *state = transition(state.clone(), CycleEvent::LoggedIn);

                // Only an explicit backend "false" means onboarding is pending
                if login.state.is_completed_navigation_onboarding == Some(false) {
                    info!("{} | completing navigation onboarding", self.identity);
                    absorb(
                        &self.identity,
                        "complete onboarding",
                        cooldown,
                        self.backend.complete_onboarding(),
                    )
                    .await?;
                }
            }

            // 2. Fresh snapshot; the backend is the source of truth
            let snapshot = match absorb(&self.identity, "balance", cooldown, self.backend.balance())
                .await?
            {
                Some(snapshot) => snapshot,
                None => {
                    self.pace(state).await;
                    continue;
                }
            };

            // 3. Size and submit the batch
            let candidate = {
                let mut rng = rand::thread_rng();
                ledger::draw_candidate(&mut rng, self.config.taps_per_cycle)
            };
            let taps =
                ledger::plan_taps(candidate, snapshot.coins_per_click, snapshot.current_energy);

            if absorb(&self.identity, "tap", cooldown, self.backend.send_taps(taps))
                .await?
                .is_none()
            {
                self.pace(state).await;
                continue;
            }
            *state = transition(state.clone(), CycleEvent::BatchSubmitted);

            let after = match absorb(&self.identity, "balance", cooldown, self.backend.balance())
                .await?
            {
                Some(after) => after,
                None => {
                    self.pace(state).await;
                    continue;
                }
            };

            // Delta is observability only; sizing always reads the snapshot
            if let Some(prev) = previous_balance {
                let delta = ledger::balance_delta(after.coins_balance, prev);
                info!(
                    "{} | tapped {} | balance: {} ({:+})",
                    self.identity, taps, after.coins_balance, delta
                );
            } else {
                info!(
                    "{} | tapped {} | balance: {}",
                    self.identity, taps, after.coins_balance
                );
            }
            previous_balance = Some(after.coins_balance);

            // 4. Energy bonus, queried fresh every cycle
            let status = match absorb(
                &self.identity,
                "boost status",
                cooldown,
                self.backend.boost_status(),
            )
            .await?
            {
                Some(status) => status,
                None => {
                    self.pace(state).await;
                    continue;
                }
            };

            if boost::should_apply(
                &status,
                after.current_energy,
                self.config.min_available_energy,
                self.config.apply_daily_energy,
            ) {
                info!(
                    "{} | sleeping {}s before applying the daily energy boost",
                    self.identity,
                    BOOST_PACING.as_secs()
                );
                self.idle(BOOST_PACING).await;

                if absorb(
                    &self.identity,
                    "apply boost",
                    cooldown,
                    self.backend.apply_boost(),
                )
                .await?
                == Some(true)
                {
                    info!("{} | energy boost applied", self.identity);
                    self.idle(BOOST_SETTLE).await;
                    *state = transition(state.clone(), CycleEvent::BoostApplied);
                }

                // Energy was just replenished; no depletion rest this cycle
                *state = transition(state.clone(), CycleEvent::CyclePaced);
                continue;
            }

            // 5. Depletion rest
            if ledger::is_depleted(after.current_energy, self.config.min_available_energy) {
                info!(
                    "{} | minimum energy reached: {} | resting {}s",
                    self.identity, after.current_energy, self.config.sleep_by_min_energy
                );
                *state = transition(state.clone(), CycleEvent::EnergyDepleted);
                self.idle(Duration::from_secs(self.config.sleep_by_min_energy))
                    .await;
                *state = transition(state.clone(), CycleEvent::CyclePaced);
                continue;
            }

            // 6. Randomized pacing before the next cycle
            self.pace(state).await;
        }
    }

    /// Randomized inter-cycle sleep
    async fn pace(&mut self, state: &mut CycleState) {
        let secs = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.config.sleep_between_taps[0]..=self.config.sleep_between_taps[1])
        };
        debug!("{} | sleeping {}s before next cycle", self.identity, secs);
        self.idle(Duration::from_secs(secs)).await;
        *state = transition(state.clone(), CycleEvent::CyclePaced);
    }

    /// Sleep that wakes early on the stop signal
    async fn idle(&mut self, duration: Duration) {
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.stop.changed() => {}
        }
    }

    fn stopped(&self) -> bool {
        *self.stop.borrow()
    }
}

/// The token is absent or has aged past its TTL
fn needs_refresh(obtained: Option<Instant>, ttl: Duration) -> bool {
    match obtained {
        None => true,
        Some(at) => at.elapsed() >= ttl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_needs_refresh_without_token() {
        assert!(needs_refresh(None, Duration::from_secs(3600)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_needs_refresh_tracks_ttl() {
        let obtained = Some(Instant::now());
        let ttl = Duration::from_secs(3600);
        assert!(!needs_refresh(obtained, ttl));

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert!(!needs_refresh(obtained, ttl));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(needs_refresh(obtained, ttl));
    }
}
