//! Account and delegate identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An account on the host chain: bucket holders, payout recipients, admins.
///
/// The core treats it as an opaque, comparable name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Length in bytes of a delegate identifier.
pub const DELEGATE_ID_LEN: usize = 12;

#[derive(Debug, Error, PartialEq)]
pub enum DelegateIdError {
    #[error("delegate id must be {DELEGATE_ID_LEN} bytes, got {0}")]
    Length(usize),

    #[error("delegate id is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// The identity a bucket's voting weight is attributed to.
///
/// A fixed 12-byte name, rendered as `0x`-prefixed hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DelegateId([u8; DELEGATE_ID_LEN]);

impl DelegateId {
    pub const fn new(bytes: [u8; DELEGATE_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DelegateIdError> {
        let arr: [u8; DELEGATE_ID_LEN] = bytes
            .try_into()
            .map_err(|_| DelegateIdError::Length(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, DelegateIdError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DELEGATE_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for DelegateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for DelegateId {
    type Err = DelegateIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for DelegateId {
    type Error = DelegateIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<DelegateId> for String {
    fn from(id: DelegateId) -> Self {
        id.to_string()
    }
}
