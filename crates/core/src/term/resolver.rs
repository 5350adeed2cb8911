//! Escalation arithmetic for resolved terms.
//!
//! These functions are pure: escalated rent is computed on demand and never
//! written back. Materializing an escalated term is a separate
//! administrative action that appends a new row to the history.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{Escalation, LeaseTerm};

/// Number of whole escalation intervals elapsed between a term's
/// effective-from and the target date.
///
/// Returns zero when the date precedes the term, when no escalation is
/// configured, or before the first interval completes.
#[must_use]
pub fn escalation_intervals_elapsed(term: &LeaseTerm, on: NaiveDate) -> u32 {
    let interval_months = match term.escalation {
        Escalation::None => return 0,
        Escalation::Percentage {
            interval_months, ..
        }
        | Escalation::FixedIncrement {
            interval_months, ..
        } => interval_months,
    };
    if interval_months == 0 {
        return 0;
    }
    whole_months_between(term.effective_from, on) / interval_months
}

/// Rent under the term's escalation rule after `intervals` elapsed intervals.
///
/// Percentage escalation compounds per interval; fixed increments accumulate
/// linearly. The result is rounded to 2 decimal places with banker's
/// rounding so repeated compounding cannot drift.
#[must_use]
pub fn escalated_rent(term: &LeaseTerm, intervals: u32) -> Decimal {
    let rent = match term.escalation {
        Escalation::None => term.monthly_rent,
        Escalation::Percentage { percent, .. } => {
            let factor = Decimal::ONE + percent / Decimal::ONE_HUNDRED;
            let mut rent = term.monthly_rent;
            for _ in 0..intervals {
                rent *= factor;
            }
            rent
        }
        Escalation::FixedIncrement { amount, .. } => {
            term.monthly_rent + amount * Decimal::from(intervals)
        }
    };
    rent.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Rent effective on the given date, applying any elapsed escalation.
#[must_use]
pub fn rent_on(term: &LeaseTerm, date: NaiveDate) -> Decimal {
    escalated_rent(term, escalation_intervals_elapsed(term, date))
}

/// Whole calendar months from `from` to `to`, zero if `to` precedes `from`.
fn whole_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let year_months = (to.year() - from.year()) * 12;
    let months = year_months + i32::try_from(to.month()).unwrap_or(0)
        - i32::try_from(from.month()).unwrap_or(0);
    // A month only counts once its day-of-month anniversary passes.
    let months = if to.day() < from.day() {
        months - 1
    } else {
        months
    };
    u32::try_from(months.max(0)).unwrap_or(0)
}
