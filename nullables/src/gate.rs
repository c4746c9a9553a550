//! Nullable pause switch and admin list.

use bucket_engine::{Authorizer, PauseGate};
use bucket_types::Address;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub struct NullPauseGate {
    paused: AtomicBool,
}

impl NullPauseGate {
    pub fn new() -> Self {
        Self {
            paused: AtomicBool::new(false),
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn unpause(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }
}

impl Default for NullPauseGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PauseGate for NullPauseGate {
    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// Grants admin rights to a fixed set of addresses.
pub struct NullAuthorizer {
    admins: Mutex<HashSet<Address>>,
}

impl NullAuthorizer {
    pub fn new(admins: impl IntoIterator<Item = Address>) -> Self {
        Self {
            admins: Mutex::new(admins.into_iter().collect()),
        }
    }

    pub fn grant(&self, admin: Address) {
        self.admins.lock().unwrap().insert(admin);
    }

    pub fn revoke(&self, admin: &Address) {
        self.admins.lock().unwrap().remove(admin);
    }
}

impl Authorizer for NullAuthorizer {
    fn is_admin(&self, caller: &Address) -> bool {
        self.admins.lock().unwrap().contains(caller)
    }
}
