//! Configuration management for Tapmill
//!
//! Loaded once at startup from `tapmill.toml`. Global tuning knobs live in
//! [`TapConfig`]; each automated account is an `[[identity]]` entry.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Result, TapError};

/// Tapmill configuration
///
/// Loaded from `tapmill.toml` in the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Below this energy the worker rests instead of tapping
    #[serde(default = "default_min_available_energy")]
    pub min_available_energy: u64,

    /// Seconds to sleep when energy is depleted
    #[serde(default = "default_sleep_by_min_energy")]
    pub sleep_by_min_energy: u64,

    /// Apply the daily energy bonus automatically when eligible
    #[serde(default = "default_apply_daily_energy")]
    pub apply_daily_energy: bool,

    /// Inclusive [min, max] bounds for the per-cycle tap draw
    #[serde(default = "default_taps_per_cycle")]
    pub taps_per_cycle: [u32; 2],

    /// Inclusive [min, max] bounds in seconds for the pacing sleep
    #[serde(default = "default_sleep_between_taps")]
    pub sleep_between_taps: [u64; 2],

    /// Seconds a login token stays valid before a forced refresh
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Fixed cool-down in seconds after a transient remote failure
    #[serde(default = "default_error_cooldown_secs")]
    pub error_cooldown_secs: u64,

    /// Accounts to run, one independent worker each
    #[serde(default, rename = "identity")]
    pub identities: Vec<IdentityConfig>,
}

/// One automated account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Name used in every log line for this identity
    pub name: String,

    /// Captured web-view callback URL carrying the signed auth payload
    pub web_app_url: String,

    /// Optional proxy URL for all of this identity's outbound traffic
    #[serde(default)]
    pub proxy: Option<String>,
}

// Default value providers

fn default_min_available_energy() -> u64 {
    100
}

fn default_sleep_by_min_energy() -> u64 {
    200
}

fn default_apply_daily_energy() -> bool {
    true
}

fn default_taps_per_cycle() -> [u32; 2] {
    [50, 200]
}

fn default_sleep_between_taps() -> [u64; 2] {
    [10, 25]
}

fn default_token_ttl_secs() -> u64 {
    3600
}

fn default_error_cooldown_secs() -> u64 {
    3
}

impl TapConfig {
    /// Load configuration from the given path, or use defaults if absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| TapError::Config(format!("failed to parse {}: {}", path.display(), e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to the given path
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| TapError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the bounds an operator could get backwards
    pub fn validate(&self) -> Result<()> {
        if self.taps_per_cycle[0] > self.taps_per_cycle[1] {
            return Err(TapError::Config(format!(
                "taps_per_cycle min {} exceeds max {}",
                self.taps_per_cycle[0], self.taps_per_cycle[1]
            )));
        }
        if self.sleep_between_taps[0] > self.sleep_between_taps[1] {
            return Err(TapError::Config(format!(
                "sleep_between_taps min {} exceeds max {}",
                self.sleep_between_taps[0], self.sleep_between_taps[1]
            )));
        }
        if self.token_ttl_secs == 0 {
            return Err(TapError::Config("token_ttl_secs must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            min_available_energy: default_min_available_energy(),
            sleep_by_min_energy: default_sleep_by_min_energy(),
            apply_daily_energy: default_apply_daily_energy(),
            taps_per_cycle: default_taps_per_cycle(),
            sleep_between_taps: default_sleep_between_taps(),
            token_ttl_secs: default_token_ttl_secs(),
            error_cooldown_secs: default_error_cooldown_secs(),
            identities: Vec::new(),
        }
    }
}
