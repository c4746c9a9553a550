//! Library side of `bucket-cli`: scenario format and the replay driver.

pub mod replay;
pub mod scenario;

pub use replay::{replay, ReplayStats, Replayer, Report, StepOutcome};
pub use scenario::{Scenario, Step};
