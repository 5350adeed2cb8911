//! Utility billing error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors detected while validating or applying a utility rate plan.
///
/// Every plan-shape violation maps to the `INVALID_RATE_PLAN` code and
/// blocks the plan from being used for billing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatePlanError {
    /// The plan has no slabs at all.
    #[error("Rate plan has no slabs")]
    EmptyPlan,

    /// Slab orders are not strictly increasing.
    #[error("Slab order {order} is not strictly increasing")]
    UnsortedSlabs {
        /// The offending slab order value.
        order: u16,
    },

    /// A slab does not start where the previous one ended.
    #[error("Slab starting at {actual_from} does not continue from {expected_from}")]
    NonContiguousSlabs {
        /// Where the slab should have started.
        expected_from: Decimal,
        /// Where the slab actually starts.
        actual_from: Decimal,
    },

    /// A bounded slab's upper bound does not exceed its lower bound.
    #[error("Slab range [{from}, {to}) is empty or inverted")]
    EmptySlabRange {
        /// Lower bound of the rejected slab.
        from: Decimal,
        /// Upper bound of the rejected slab.
        to: Decimal,
    },

    /// More than one slab has an unlimited upper bound.
    #[error("At most one slab may be unbounded")]
    MultipleUnboundedSlabs,

    /// The unlimited slab is not the last slab.
    #[error("The unbounded slab must be last")]
    UnboundedSlabNotLast,

    /// A slab carries a negative per-unit rate.
    #[error("Slab rate {rate} is negative")]
    NegativeRate {
        /// The rejected rate.
        rate: Decimal,
    },

    /// A slab carries a negative fixed charge.
    #[error("Slab fixed charge {charge} is negative")]
    NegativeFixedCharge {
        /// The rejected fixed charge.
        charge: Decimal,
    },

    /// Consumption passed to the charge computation is negative.
    #[error("Consumed units {0} is negative")]
    NegativeConsumption(Decimal),
}

impl RatePlanError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeConsumption(_) => "NEGATIVE_CONSUMPTION",
            _ => "INVALID_RATE_PLAN",
        }
    }
}

/// Errors raised while recording utility statements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    /// The current meter reading is below the previous one.
    #[error("Meter reading {current} is below previous reading {previous}")]
    MeterRegression {
        /// Previous reading.
        previous: Decimal,
        /// Current reading.
        current: Decimal,
    },

    /// A final statement already exists for this lease, period, and type.
    #[error("A final statement already exists for this lease, period, and utility type")]
    DuplicateFinalStatement,
}
