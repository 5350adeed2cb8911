//! Lease term domain types.
//!
//! A lease's financial parameters are versioned over time: each
//! [`LeaseTerm`] covers a half-open `[effective_from, effective_to)`
//! interval, and the intervals of one lease never overlap.

use chrono::NaiveDate;
use rentora_shared::types::{LeaseId, LeaseTermId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::TermError;

/// Rent escalation rule attached to a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Escalation {
    /// Rent never escalates under this term.
    None,
    /// Rent grows by a percentage, compounding each interval.
    Percentage {
        /// Escalation percentage per interval (e.g., 5 for 5%).
        percent: Decimal,
        /// Interval length in months.
        interval_months: u32,
    },
    /// Rent grows by a fixed amount each interval.
    FixedIncrement {
        /// Amount added per interval.
        amount: Decimal,
        /// Interval length in months.
        interval_months: u32,
    },
}

/// A time-bounded set of financial parameters for a lease.
///
/// Terms are immutable once superseded; corrections append a new row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseTerm {
    /// Unique identifier.
    pub id: LeaseTermId,
    /// Lease this term belongs to.
    pub lease_id: LeaseId,
    /// First date (inclusive) this term is effective.
    pub effective_from: NaiveDate,
    /// First date (exclusive) this term is no longer effective;
    /// `None` means open-ended.
    pub effective_to: Option<NaiveDate>,
    /// Monthly rent under this term.
    pub monthly_rent: Decimal,
    /// Security deposit held under this term.
    pub security_deposit: Decimal,
    /// Optional recurring maintenance charge.
    pub maintenance_charge: Option<Decimal>,
    /// Optional other recurring fixed charge.
    pub other_fixed_charge: Option<Decimal>,
    /// Escalation rule, applied by an administrative action that appends
    /// new terms; never applied implicitly.
    pub escalation: Escalation,
}

impl LeaseTerm {
    /// Returns true if the given date falls within `[effective_from, effective_to)`.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.is_none_or(|to| date < to)
    }
}

/// Append-only, sorted, non-overlapping interval list of a lease's terms.
///
/// Kept sorted by `effective_from`; overlap is rejected at append time so
/// resolution by containment always yields at most one term.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermHistory {
    terms: Vec<LeaseTerm>,
}

impl TermHistory {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Builds a history from existing rows, validating every interval.
    ///
    /// # Errors
    ///
    /// Returns `TermError` if any interval is inverted or overlaps another.
    pub fn from_terms(terms: Vec<LeaseTerm>) -> Result<Self, TermError> {
        let mut history = Self::new();
        for term in terms {
            history.append(term)?;
        }
        Ok(history)
    }

    /// Appends a term, enforcing interval validity and non-overlap.
    ///
    /// # Errors
    ///
    /// Returns `TermError::InvalidInterval` for an empty or inverted
    /// interval, `TermError::OverlappingTerms` if the interval intersects
    /// an existing term.
    pub fn append(&mut self, term: LeaseTerm) -> Result<(), TermError> {
        if let Some(to) = term.effective_to
            && to <= term.effective_from
        {
            return Err(TermError::InvalidInterval {
                from: term.effective_from,
                to,
            });
        }

        for existing in &self.terms {
            if Self::overlaps(existing, &term) {
                return Err(TermError::OverlappingTerms {
                    existing_from: existing.effective_from,
                    new_from: term.effective_from,
                });
            }
        }

        let position = self
            .terms
            .partition_point(|t| t.effective_from < term.effective_from);
        self.terms.insert(position, term);
        Ok(())
    }

    /// Returns the unique term effective on the given date.
    ///
    /// # Errors
    ///
    /// Returns `TermError::NoTermFound` if no interval contains the date.
    pub fn resolve(&self, lease_id: LeaseId, date: NaiveDate) -> Result<&LeaseTerm, TermError> {
        self.terms
            .iter()
            .find(|t| t.contains_date(date))
            .ok_or(TermError::NoTermFound { lease_id, date })
    }

    /// Returns the terms in effective-from order.
    #[must_use]
    pub fn as_slice(&self) -> &[LeaseTerm] {
        &self.terms
    }

    /// Returns the number of terms in the history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the history holds no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Half-open interval intersection test.
    fn overlaps(a: &LeaseTerm, b: &LeaseTerm) -> bool {
        let a_starts_before_b_ends = b.effective_to.is_none_or(|to| a.effective_from < to);
        let b_starts_before_a_ends = a.effective_to.is_none_or(|to| b.effective_from < to);
        a_starts_before_b_ends && b_starts_before_a_ends
    }
}
