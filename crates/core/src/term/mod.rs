//! Time-versioned lease financial terms.
//!
//! Terms are append-only: when the rent changes, a new row is added and the
//! old one is closed off, never mutated. Resolution is by interval
//! containment, not by "latest created".
//!
//! # Modules
//!
//! - `types` - `LeaseTerm`, escalation rules, and the `TermHistory` interval list
//! - `error` - Term-specific error types
//! - `resolver` - Containment lookup and pure escalation arithmetic

pub mod error;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod resolver_props;

pub use error::TermError;
pub use resolver::{escalated_rent, escalation_intervals_elapsed, rent_on};
pub use types::{Escalation, LeaseTerm, TermHistory};
