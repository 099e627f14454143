//! Domain error model.

use thiserror::Error;

/// Domain-level error for primitives shared by every crate.
///
/// Rule violations of a specific aggregate (e.g. contract validation) have
/// their own error enums next to the aggregate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. blank input).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
