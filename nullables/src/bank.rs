//! Nullable payout rail.

use bucket_engine::{TransferError, ValueTransfer};
use bucket_types::{Address, Amount};
use std::collections::HashMap;
use std::sync::Mutex;

/// Records every payment; can be told to reject the next ones.
pub struct NullBank {
    payments: Mutex<Vec<(Address, Amount)>>,
    rejecting: Mutex<Option<String>>,
}

impl NullBank {
    pub fn new() -> Self {
        Self {
            payments: Mutex::new(Vec::new()),
            rejecting: Mutex::new(None),
        }
    }

    /// Fail every payment with `reason` until [`Self::accept`] is called.
    pub fn reject(&self, reason: impl Into<String>) {
        *self.rejecting.lock().unwrap() = Some(reason.into());
    }

    pub fn accept(&self) {
        *self.rejecting.lock().unwrap() = None;
    }

    /// All payments in order.
    pub fn payments(&self) -> Vec<(Address, Amount)> {
        self.payments.lock().unwrap().clone()
    }

    /// Total paid to `recipient`.
    pub fn paid_to(&self, recipient: &Address) -> Amount {
        self.payments
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| r == recipient)
            .map(|(_, a)| *a)
            .sum()
    }

    /// Total per recipient.
    pub fn balances(&self) -> HashMap<Address, Amount> {
        let mut out: HashMap<Address, Amount> = HashMap::new();
        for (recipient, amount) in self.payments.lock().unwrap().iter() {
            let entry = out.entry(recipient.clone()).or_default();
            *entry = *entry + *amount;
        }
        out
    }
}

impl Default for NullBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueTransfer for NullBank {
    fn pay(&self, recipient: &Address, amount: Amount) -> Result<(), TransferError> {
        if let Some(reason) = self.rejecting.lock().unwrap().clone() {
            return Err(TransferError::Rejected(reason));
        }
        self.payments
            .lock()
            .unwrap()
            .push((recipient.clone(), amount));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_payments() {
        let bank = NullBank::new();
        let alice = Address::from("alice");
        bank.pay(&alice, Amount::new(5)).unwrap();
        bank.pay(&alice, Amount::new(7)).unwrap();
        assert_eq!(bank.paid_to(&alice), Amount::new(12));
        assert_eq!(bank.payments().len(), 2);
        assert_eq!(bank.balances()[&alice], Amount::new(12));
    }

    #[test]
    fn rejection_is_sticky_until_accepted() {
        let bank = NullBank::new();
        let alice = Address::from("alice");
        bank.reject("frozen");
        assert!(bank.pay(&alice, Amount::new(1)).is_err());
        assert!(bank.pay(&alice, Amount::new(1)).is_err());
        bank.accept();
        assert!(bank.pay(&alice, Amount::new(1)).is_ok());
        assert_eq!(bank.payments().len(), 1);
    }
}
