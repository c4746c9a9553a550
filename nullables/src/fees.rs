//! Nullable penalty fee account.

use bucket_engine::FeeAccount;
use bucket_types::Amount;
use std::sync::Mutex;

pub struct NullFeeAccount {
    rate: Mutex<u8>,
    accumulated: Mutex<Amount>,
}

impl NullFeeAccount {
    pub fn new(rate: u8) -> Self {
        Self {
            rate: Mutex::new(rate),
            accumulated: Mutex::new(Amount::ZERO),
        }
    }
}

impl Default for NullFeeAccount {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FeeAccount for NullFeeAccount {
    fn penalty_rate(&self) -> u8 {
        *self.rate.lock().unwrap()
    }

    fn set_penalty_rate(&self, rate: u8) {
        *self.rate.lock().unwrap() = rate;
    }

    fn accrue(&self, amount: Amount) {
        let mut acc = self.accumulated.lock().unwrap();
        *acc = *acc + amount;
    }

    fn accumulated(&self) -> Amount {
        *self.accumulated.lock().unwrap()
    }

    fn deduct(&self, amount: Amount) {
        let mut acc = self.accumulated.lock().unwrap();
        *acc = acc.saturating_sub(amount);
    }
}
