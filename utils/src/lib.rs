//! Shared utilities for the bucket staking workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat, LogFormatError};
