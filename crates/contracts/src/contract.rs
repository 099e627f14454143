use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use pactledger_core::{ContractId, Entity, ValueObject};

use crate::email::{self, EmailError};

/// Calendar date format accepted for `startDate` / `endDate`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A participant in a contract.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Party {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Free-form role, e.g. "Client" or "Provider".
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    /// Optional; empty means "not provided".
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
}

impl Party {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            email: String::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

impl ValueObject for Party {}

/// Commercial terms of a contract.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Terms {
    /// `YYYY-MM-DD`, or empty.
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    /// `YYYY-MM-DD`, or empty.
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: f64,
    /// Three-letter upper-case code, or empty.
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
}

impl Terms {
    /// Whether both ends of the contract period are set.
    pub fn has_period(&self) -> bool {
        !self.start_date.is_empty() && !self.end_date.is_empty()
    }
}

impl ValueObject for Terms {}

/// Aggregate root: Contract.
///
/// Constructed transiently from a parsed document (or a store row), validated
/// once at load time. Absent document fields default to empty / zero so that
/// validation, not decoding, decides what is acceptable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contract {
    #[serde(deserialize_with = "null_as_default")]
    pub id: ContractId,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parties: Vec<Party>,
    #[serde(deserialize_with = "null_as_default")]
    pub terms: Terms,
}

/// Decode an explicit `null` the same way as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Entity for Contract {
    type Id = ContractId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Reason a contract failed validation.
///
/// Validation is pass/fail and stops at the first violated rule, so exactly
/// one of these is reported per contract.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("contract ID is required")]
    MissingId,

    #[error("contract title is required")]
    MissingTitle,

    #[error("contract status is required")]
    MissingStatus,

    #[error("at least one party is required")]
    NoParties,

    #[error("party name is required (party #{index})")]
    MissingPartyName { index: usize },

    #[error("party role is required (party #{index} {name:?})")]
    MissingPartyRole { index: usize, name: String },

    #[error("invalid email address for party {name}: {source}")]
    InvalidEmail {
        index: usize,
        name: String,
        email: String,
        #[source]
        source: EmailError,
    },

    #[error("invalid start date format: {value:?}: {reason}")]
    InvalidStartDate { value: String, reason: String },

    #[error("invalid end date format: {value:?}: {reason}")]
    InvalidEndDate { value: String, reason: String },

    #[error("end date cannot be before start date ({end} < {start})")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("contract value cannot be negative: {value}")]
    NegativeValue { value: f64 },

    #[error("invalid currency code: {code}")]
    InvalidCurrency { code: String },
}

impl Contract {
    /// Check every contract rule in a fixed order, returning the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(self)
    }
}

/// Validate a contract.
///
/// Rule order: id, title, status, parties present, each party (name, role,
/// email), period, value, currency. The first failing rule wins even when
/// later rules are violated too.
pub fn validate(contract: &Contract) -> Result<(), ValidationError> {
    if contract.id.is_empty() {
        return Err(ValidationError::MissingId);
    }
    if contract.title.is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if contract.status.is_empty() {
        return Err(ValidationError::MissingStatus);
    }

    if contract.parties.is_empty() {
        return Err(ValidationError::NoParties);
    }
    for (index, party) in contract.parties.iter().enumerate() {
        validate_party(index, party)?;
    }

    validate_terms(&contract.terms)
}

fn validate_party(index: usize, party: &Party) -> Result<(), ValidationError> {
    if party.name.is_empty() {
        return Err(ValidationError::MissingPartyName { index });
    }
    if party.role.is_empty() {
        return Err(ValidationError::MissingPartyRole {
            index,
            name: party.name.clone(),
        });
    }
    if !party.email.is_empty() {
        email::parse_address(&party.email).map_err(|source| ValidationError::InvalidEmail {
            index,
            name: party.name.clone(),
            email: party.email.clone(),
            source,
        })?;
    }
    Ok(())
}

fn validate_terms(terms: &Terms) -> Result<(), ValidationError> {
    if terms.has_period() {
        let start = parse_date(&terms.start_date).map_err(|reason| {
            ValidationError::InvalidStartDate {
                value: terms.start_date.clone(),
                reason,
            }
        })?;
        let end = parse_date(&terms.end_date).map_err(|reason| ValidationError::InvalidEndDate {
            value: terms.end_date.clone(),
            reason,
        })?;
        if end < start {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
    }

    if terms.value < 0.0 {
        return Err(ValidationError::NegativeValue { value: terms.value });
    }

    if !terms.currency.is_empty() && !is_valid_currency(&terms.currency) {
        return Err(ValidationError::InvalidCurrency {
            code: terms.currency.clone(),
        });
    }

    Ok(())
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// `chrono` alone accepts unpadded fields (`2024-1-5`); the shape is checked
/// first so only the zero-padded form passes.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let bytes = value.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_shaped {
        return Err("expected YYYY-MM-DD".to_string());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| e.to_string())
}

/// Simplified currency check: exactly three ASCII upper-case letters.
///
/// Not checked against the ISO 4217 list.
pub fn is_valid_currency(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}
