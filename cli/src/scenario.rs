//! JSON scenario format.
//!
//! ```json
//! {
//!   "admin": "root",
//!   "steps": [
//!     { "op": "add_type", "amount": 100, "duration": 10 },
//!     { "op": "stake", "caller": "alice", "amount": 100, "duration": 10,
//!       "delegate": "0x010101010101010101010101" },
//!     { "op": "unlock", "caller": "alice", "id": 1 },
//!     { "op": "advance", "blocks": 10 },
//!     { "op": "unstake", "caller": "alice", "id": 1 }
//!   ]
//! }
//! ```

use bucket_types::{Address, Amount, BucketId, DelegateId, Duration};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

fn default_admin() -> Address {
    Address::from("admin")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Holder of administration rights during the replay.
    #[serde(default = "default_admin")]
    pub admin: Address,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// One call against the engine. Durations are blocks.
///
/// Amounts are raw units, written either as a JSON number or as a decimal
/// string for values past `u64`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddType {
        #[serde(with = "raw_amount")]
        amount: Amount,
        duration: Duration,
    },
    DeactivateType {
        #[serde(with = "raw_amount")]
        amount: Amount,
        duration: Duration,
    },
    ActivateType {
        #[serde(with = "raw_amount")]
        amount: Amount,
        duration: Duration,
    },
    /// `paid` defaults to `amount`.
    Stake {
        caller: Address,
        #[serde(with = "raw_amount")]
        amount: Amount,
        duration: Duration,
        delegate: DelegateId,
        #[serde(default, with = "raw_amount::option")]
        paid: Option<Amount>,
    },
    Lock {
        caller: Address,
        id: BucketId,
        duration: Duration,
    },
    Unlock {
        caller: Address,
        id: BucketId,
    },
    Unstake {
        caller: Address,
        id: BucketId,
    },
    /// `recipient` defaults to the caller.
    Withdraw {
        caller: Address,
        id: BucketId,
        #[serde(default)]
        recipient: Option<Address>,
    },
    EmergencyWithdraw {
        caller: Address,
        id: BucketId,
        #[serde(default)]
        recipient: Option<Address>,
    },
    Expand {
        caller: Address,
        id: BucketId,
        #[serde(with = "raw_amount")]
        amount: Amount,
        duration: Duration,
        #[serde(default, with = "raw_amount")]
        paid: Amount,
    },
    ChangeDelegate {
        caller: Address,
        id: BucketId,
        delegate: DelegateId,
    },
    Merge {
        caller: Address,
        ids: Vec<BucketId>,
        duration: Duration,
        #[serde(default, with = "raw_amount")]
        paid: Amount,
    },
    Transfer {
        caller: Address,
        id: BucketId,
        to: Address,
    },
    Advance {
        blocks: u64,
    },
    SetPenaltyRate {
        rate: u8,
    },
}

impl Step {
    /// The `op` tag, for reporting.
    pub fn op(&self) -> &'static str {
        match self {
            Self::AddType { .. } => "add_type",
            Self::DeactivateType { .. } => "deactivate_type",
            Self::ActivateType { .. } => "activate_type",
            Self::Stake { .. } => "stake",
            Self::Lock { .. } => "lock",
            Self::Unlock { .. } => "unlock",
            Self::Unstake { .. } => "unstake",
            Self::Withdraw { .. } => "withdraw",
            Self::EmergencyWithdraw { .. } => "emergency_withdraw",
            Self::Expand { .. } => "expand",
            Self::ChangeDelegate { .. } => "change_delegate",
            Self::Merge { .. } => "merge",
            Self::Transfer { .. } => "transfer",
            Self::Advance { .. } => "advance",
            Self::SetPenaltyRate { .. } => "set_penalty_rate",
        }
    }
}

/// Amount as a JSON number or decimal string.
///
/// Tagged step fields are buffered before they reach their types, and the
/// buffer has no room for `u128`, so `Amount` cannot be read directly.
mod raw_amount {
    use super::*;

    struct RawAmount(Amount);

    impl Serialize for RawAmount {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            match u64::try_from(self.0.raw()) {
                Ok(small) => s.serialize_u64(small),
                Err(_) => s.collect_str(&self.0),
            }
        }
    }

    struct RawAmountVisitor;

    impl<'de> Visitor<'de> for RawAmountVisitor {
        type Value = RawAmount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawAmount, E> {
            Ok(RawAmount(Amount::new(u128::from(v))))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<RawAmount, E> {
            v.parse::<u128>()
                .map(|raw| RawAmount(Amount::new(raw)))
                .map_err(|e| E::custom(format!("invalid amount {v:?}: {e}")))
        }
    }

    impl<'de> Deserialize<'de> for RawAmount {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_any(RawAmountVisitor)
        }
    }

    pub fn serialize<S: Serializer>(amount: &Amount, s: S) -> Result<S::Ok, S::Error> {
        RawAmount(*amount).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Amount, D::Error> {
        RawAmount::deserialize(d).map(|raw| raw.0)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(amount: &Option<Amount>, s: S) -> Result<S::Ok, S::Error> {
            amount.map(RawAmount).serialize(s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Amount>, D::Error> {
            Option::<RawAmount>::deserialize(d).map(|raw| raw.map(|r| r.0))
        }
    }
}
