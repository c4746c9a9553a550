//! All nullables wired together.

use crate::{
    NullAuthorizer, NullBank, NullClock, NullEventSink, NullFeeAccount, NullOwnership,
    NullPauseGate,
};
use bucket_engine::Collaborators;
use bucket_types::Address;
use std::sync::Arc;

/// One of each nullable, kept as concrete handles so tests can drive and
/// inspect them while the engine holds the trait objects.
#[derive(Clone)]
pub struct NullEnvironment {
    pub clock: Arc<NullClock>,
    pub ownership: Arc<NullOwnership>,
    pub bank: Arc<NullBank>,
    pub fees: Arc<NullFeeAccount>,
    pub pause: Arc<NullPauseGate>,
    pub auth: Arc<NullAuthorizer>,
    pub events: Arc<NullEventSink>,
}

impl NullEnvironment {
    /// Height zero, no penalty, `admin` as the only administrator.
    pub fn new(admin: Address) -> Self {
        Self {
            clock: Arc::new(NullClock::new(0)),
            ownership: Arc::new(NullOwnership::new()),
            bank: Arc::new(NullBank::new()),
            fees: Arc::new(NullFeeAccount::default()),
            pause: Arc::new(NullPauseGate::new()),
            auth: Arc::new(NullAuthorizer::new([admin])),
            events: Arc::new(NullEventSink::new()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            clock: self.clock.clone(),
            ownership: self.ownership.clone(),
            bank: self.bank.clone(),
            fees: self.fees.clone(),
            pause: self.pause.clone(),
            auth: self.auth.clone(),
            events: self.events.clone(),
        }
    }
}
