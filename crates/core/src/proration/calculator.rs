//! Proration policies and the prorated-amount calculation.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Policy selecting the denominator used when scaling a monthly charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProrationMethod {
    /// Scale by actual days in the calendar month (28-31).
    ActualDaysInMonth,
    /// Scale by a fixed 30-day month regardless of calendar length.
    ThirtyDayMonth,
}

impl ProrationMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ActualDaysInMonth => "actual_days_in_month",
            Self::ThirtyDayMonth => "thirty_day_month",
        }
    }
}

/// Errors raised by the proration calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProrationError {
    /// The sub-range is inverted or does not lie within one calendar month.
    #[error("Proration range [{from}, {to}) is invalid")]
    InvalidProrationRange {
        /// Start of the rejected range (inclusive).
        from: NaiveDate,
        /// End of the rejected range (exclusive).
        to: NaiveDate,
    },
}

/// Number of days in the calendar month containing `date`.
#[must_use]
pub fn days_in_month(date: NaiveDate) -> i64 {
    let first = first_of_month(date);
    let next = first_of_next_month(date);
    (next - first).num_days()
}

/// Prorates a full-month charge over the half-open day range `[from, to)`.
///
/// The range must lie within a single calendar month. A range covering the
/// whole month returns `amount` exactly, with no rounding drift; an empty
/// range (`from == to`) returns zero. Partial ranges scale by
/// days-in-range over the policy's denominator, rounded to 2 decimal
/// places with banker's rounding.
///
/// # Errors
///
/// Returns `ProrationError::InvalidProrationRange` for inverted ranges or
/// ranges crossing a month boundary.
pub fn prorate(
    amount: Decimal,
    from: NaiveDate,
    to: NaiveDate,
    method: ProrationMethod,
) -> Result<Decimal, ProrationError> {
    if to < from {
        return Err(ProrationError::InvalidProrationRange { from, to });
    }
    if to == from {
        return Ok(Decimal::ZERO);
    }

    let month_start = first_of_month(from);
    let month_end = first_of_next_month(from);
    if to > month_end {
        return Err(ProrationError::InvalidProrationRange { from, to });
    }

    // Full-month coverage bypasses the ratio entirely; this is what keeps
    // a 31-day month exact under the fixed 30-day policy.
    if from == month_start && to == month_end {
        return Ok(amount);
    }

    let days_in_range = (to - from).num_days();
    let denominator = match method {
        ProrationMethod::ActualDaysInMonth => days_in_month(from),
        ProrationMethod::ThirtyDayMonth => 30,
    };

    let prorated = amount * Decimal::from(days_in_range) / Decimal::from(denominator);
    Ok(prorated.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = (date.year(), date.month());
    if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("first of next month exists")
}
