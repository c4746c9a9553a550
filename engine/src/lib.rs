//! Bucket lifecycle engine.
//!
//! Buckets are time-locked stake positions backing delegated votes. This
//! crate drives them through their lifecycle:
//!
//! ```text
//! stake ─▶ Locked ──unlock──▶ Unlocked ──unstake──▶ Unstaked ──withdraw──▶ gone
//!             ▲                   │
//!             └───────lock────────┘
//! ```
//!
//! and handles the reshaping operations (expand, merge, delegate changes),
//! their batch forms, registry and fee administration, and snapshots.
//! Everything outside the core (handle ownership, time, payouts, fees,
//! pausing, admin rights, events) is reached through [`collaborators`].

pub mod admin;
pub mod batch;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod persist;

pub use collaborators::{
    Authorizer, BucketOwnership, Clock, Collaborators, EventSink, FeeAccount, PauseGate,
    TransferError, ValueTransfer,
};
pub use config::StakingConfig;
pub use engine::LifecycleEngine;
pub use error::StakingError;
pub use events::StakingEvent;
