//! Staking configuration with TOML file support.

use crate::StakingError;
use bucket_types::params::BLOCKS_PER_DAY;
use bucket_types::{Amount, Duration, TypePolicy};
use serde::{Deserialize, Serialize};

/// Deployment parameters for the staking core.
///
/// Durations are in blocks, amounts in raw units. Can be loaded from a TOML
/// file via [`StakingConfig::from_toml_file`] or built programmatically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Blocks between unstake and withdraw.
    #[serde(default = "default_withdrawal_delay")]
    pub withdrawal_delay: u64,

    /// Granularity of bucket durations.
    #[serde(default = "default_duration_unit")]
    pub duration_unit: u64,

    #[serde(default = "default_min_duration")]
    pub min_duration: u64,

    #[serde(default = "default_max_duration")]
    pub max_duration: u64,

    /// Smallest amount a bucket type may carry.
    #[serde(default = "default_min_amount")]
    pub min_amount: u64,

    /// Reject durations that are not whole multiples of `duration_unit`.
    #[serde(default = "default_true")]
    pub enforce_duration_unit: bool,

    /// Emergency-withdraw penalty in percent, applied at engine start.
    #[serde(default = "default_penalty_rate")]
    pub initial_penalty_rate: u8,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_duration_unit() -> u64 {
    BLOCKS_PER_DAY
}

fn default_withdrawal_delay() -> u64 {
    3 * BLOCKS_PER_DAY
}

fn default_min_duration() -> u64 {
    BLOCKS_PER_DAY
}

fn default_max_duration() -> u64 {
    3 * 365 * BLOCKS_PER_DAY
}

fn default_min_amount() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

fn default_penalty_rate() -> u8 {
    0
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl StakingConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, StakingError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StakingError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, StakingError> {
        toml::from_str(s).map_err(|e| StakingError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, StakingError> {
        toml::to_string_pretty(self).map_err(|e| StakingError::Config(e.to_string()))
    }

    /// Check the values are mutually consistent.
    pub fn validate(&self) -> Result<(), StakingError> {
        if self.duration_unit == 0 {
            return Err(StakingError::Config("duration_unit must be positive".into()));
        }
        if self.min_amount == 0 {
            return Err(StakingError::Config("min_amount must be positive".into()));
        }
        if self.min_duration > self.max_duration {
            return Err(StakingError::Config(format!(
                "min_duration {} exceeds max_duration {}",
                self.min_duration, self.max_duration
            )));
        }
        if self.enforce_duration_unit
            && (self.min_duration % self.duration_unit != 0
                || self.max_duration % self.duration_unit != 0)
        {
            return Err(StakingError::Config(
                "duration bounds must be multiples of duration_unit".into(),
            ));
        }
        if self.initial_penalty_rate > 100 {
            return Err(StakingError::Config(format!(
                "initial_penalty_rate {} exceeds 100",
                self.initial_penalty_rate
            )));
        }
        if !matches!(self.log_format.as_str(), "human" | "json") {
            return Err(StakingError::Config(format!(
                "unknown log_format {:?}",
                self.log_format
            )));
        }
        Ok(())
    }

    pub fn withdrawal_delay(&self) -> Duration {
        Duration::blocks_of(self.withdrawal_delay)
    }

    /// The bounds handed to the bucket-type registry.
    pub fn type_policy(&self) -> TypePolicy {
        TypePolicy {
            min_amount: Amount::new(u128::from(self.min_amount)),
            min_duration: Duration::blocks_of(self.min_duration),
            max_duration: Duration::blocks_of(self.max_duration),
            duration_unit: Duration::blocks_of(self.duration_unit),
            enforce_unit: self.enforce_duration_unit,
        }
    }
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            withdrawal_delay: default_withdrawal_delay(),
            duration_unit: default_duration_unit(),
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
            min_amount: default_min_amount(),
            enforce_duration_unit: default_true(),
            initial_penalty_rate: default_penalty_rate(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
