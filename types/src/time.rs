//! Logical time.
//!
//! All lifecycle timing is measured in block heights supplied by the host
//! chain. The core never reads the wall clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical timestamp: the height of the block a call executes in.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// Height zero.
    pub const GENESIS: Self = Self(0);

    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The height `duration` blocks after this one (saturating).
    pub fn after(&self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.blocks()))
    }

    /// Blocks remaining from `now` until this height, or zero if already reached.
    pub fn blocks_from(&self, now: BlockHeight) -> u64 {
        self.0.saturating_sub(now.0)
    }

    /// Whether `now` has reached this height.
    pub fn is_reached(&self, now: BlockHeight) -> bool {
        now.0 >= self.0
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A span of logical time, in blocks.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Duration(u64);

impl Duration {
    pub const ZERO: Self = Self(0);

    pub const fn blocks_of(blocks: u64) -> Self {
        Self(blocks)
    }

    pub fn blocks(&self) -> u64 {
        self.0
    }

    pub fn checked_mul(self, factor: u64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    /// Whether this duration is a whole multiple of `unit`.
    pub fn is_multiple_of(&self, unit: Duration) -> bool {
        unit.0 != 0 && self.0 % unit.0 == 0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} blocks", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_saturates() {
        let h = BlockHeight::new(u64::MAX - 1);
        assert_eq!(h.after(Duration::blocks_of(10)), BlockHeight::new(u64::MAX));
    }

    #[test]
    fn blocks_from_counts_down_to_zero() {
        let target = BlockHeight::new(150);
        assert_eq!(target.blocks_from(BlockHeight::new(100)), 50);
        assert_eq!(target.blocks_from(BlockHeight::new(150)), 0);
        assert_eq!(target.blocks_from(BlockHeight::new(400)), 0);
    }

    #[test]
    fn multiple_of_zero_unit_is_false() {
        assert!(!Duration::blocks_of(10).is_multiple_of(Duration::ZERO));
        assert!(Duration::blocks_of(10).is_multiple_of(Duration::blocks_of(5)));
        assert!(!Duration::blocks_of(11).is_multiple_of(Duration::blocks_of(5)));
    }
}
