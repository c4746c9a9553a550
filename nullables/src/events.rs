//! Nullable event sink that remembers everything it was sent.

use bucket_engine::{EventSink, StakingEvent};
use std::sync::Mutex;

pub struct NullEventSink {
    events: Mutex<Vec<StakingEvent>>,
}

impl NullEventSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<StakingEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<StakingEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }

    /// Drain and return the recorded events.
    pub fn take(&self) -> Vec<StakingEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl Default for NullEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for NullEventSink {
    fn emit(&self, event: StakingEvent) {
        self.events.lock().unwrap().push(event);
    }
}
