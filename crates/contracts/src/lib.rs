//! Contracts domain module.
//!
//! Business rules for contract records (parties, terms, validation) and their
//! text projections, implemented purely as deterministic domain logic
//! (no IO, no storage).

pub mod contract;
pub mod email;
pub mod render;

pub use contract::{
    Contract, DATE_FORMAT, Party, Terms, ValidationError, is_valid_currency, parse_date, validate,
};
pub use email::{EmailError, parse_address};
pub use render::{render_listing, render_markdown};
