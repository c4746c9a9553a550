//! Bounds every registered bucket type must satisfy.

use crate::amount::Amount;
use crate::time::Duration;
use serde::{Deserialize, Serialize};

/// Blocks per day at a 5 second block time.
pub const BLOCKS_PER_DAY: u64 = 86_400 / 5;

/// Policy constants for bucket types.
///
/// These vary between deployments, so they are configuration rather than
/// hard-coded rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypePolicy {
    /// Smallest amount a bucket type may carry. Always at least 1.
    pub min_amount: Amount,
    pub min_duration: Duration,
    pub max_duration: Duration,
    /// Durations must be whole multiples of this when `enforce_unit` is set.
    pub duration_unit: Duration,
    pub enforce_unit: bool,
}

impl TypePolicy {
    /// A policy accepting any non-zero amount and any duration.
    pub fn permissive() -> Self {
        Self {
            min_amount: Amount::new(1),
            min_duration: Duration::ZERO,
            max_duration: Duration::blocks_of(u64::MAX),
            duration_unit: Duration::blocks_of(1),
            enforce_unit: false,
        }
    }

    pub fn amount_allowed(&self, amount: Amount) -> bool {
        !amount.is_zero() && amount >= self.min_amount
    }

    pub fn duration_allowed(&self, duration: Duration) -> bool {
        if duration < self.min_duration || duration > self.max_duration {
            return false;
        }
        !self.enforce_unit || duration.is_multiple_of(self.duration_unit)
    }
}

impl Default for TypePolicy {
    fn default() -> Self {
        let unit = Duration::blocks_of(BLOCKS_PER_DAY);
        Self {
            min_amount: Amount::new(1),
            min_duration: unit,
            max_duration: Duration::blocks_of(BLOCKS_PER_DAY * 365 * 3),
            duration_unit: unit,
            enforce_unit: true,
        }
    }
}
