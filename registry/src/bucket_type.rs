//! A registered bucket type and its activation history.

use bucket_types::{Amount, BlockHeight, Duration};
use serde::{Deserialize, Serialize};

/// Stable position of a bucket type in the registry.
pub type TypeIndex = usize;

/// One stretch of time during which a type accepted new commitments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationPeriod {
    pub start: BlockHeight,
    /// `None` while the period is still open.
    pub end: Option<BlockHeight>,
}

impl ActivationPeriod {
    pub fn contains(&self, height: BlockHeight) -> bool {
        height >= self.start && self.end.map_or(true, |end| height < end)
    }
}

/// A registered `(amount, duration)` pair.
///
/// Toggling appends to `periods`; amount and duration never change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketType {
    pub amount: Amount,
    pub duration: Duration,
    periods: Vec<ActivationPeriod>,
}

impl BucketType {
    pub(crate) fn new(amount: Amount, duration: Duration, now: BlockHeight) -> Self {
        Self {
            amount,
            duration,
            periods: vec![ActivationPeriod {
                start: now,
                end: None,
            }],
        }
    }

    /// Start of the latest activation period.
    pub fn activated_at(&self) -> BlockHeight {
        self.periods
            .last()
            .map(|p| p.start)
            .unwrap_or(BlockHeight::GENESIS)
    }

    /// End of the latest activation period; `None` while active.
    pub fn deactivated_at(&self) -> Option<BlockHeight> {
        self.periods.last().and_then(|p| p.end)
    }

    pub fn is_active(&self) -> bool {
        self.deactivated_at().is_none()
    }

    /// Whether the type accepted commitments at `height`.
    pub fn was_active_at(&self, height: BlockHeight) -> bool {
        self.periods.iter().any(|p| p.contains(height))
    }

    pub fn periods(&self) -> &[ActivationPeriod] {
        &self.periods
    }

    pub(crate) fn close(&mut self, at: BlockHeight) {
        if let Some(current) = self.periods.last_mut() {
            current.end = Some(at);
        }
    }

    pub(crate) fn reopen(&mut self, at: BlockHeight) {
        self.periods.push(ActivationPeriod {
            start: at,
            end: None,
        });
    }
}
