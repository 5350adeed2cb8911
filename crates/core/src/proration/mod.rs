//! Partial-period charge calculation.
//!
//! When a billing period does not align with a full calendar month, the
//! full-period charge is scaled by the covered share of the month. The
//! policy is a per-lease configuration value, not a global.

pub mod calculator;

#[cfg(test)]
mod calculator_props;

pub use calculator::{days_in_month, prorate, ProrationError, ProrationMethod};
