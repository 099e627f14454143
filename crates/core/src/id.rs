//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a contract (primary key in storage).
///
/// Contract ids are free-form text chosen by whoever authored the contract
/// document (e.g. `"TEST-001"`). Deserialization never rejects a value: an
/// empty id is a contract validation failure, reported in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ContractId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContractId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ContractId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Parses user input (e.g. a CLI argument); surrounding whitespace is
/// trimmed and blank input is rejected.
impl FromStr for ContractId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("ContractId: cannot be blank"));
        }
        Ok(Self(trimmed.to_string()))
    }
}
