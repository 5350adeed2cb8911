//! Term error types.

use chrono::NaiveDate;
use rentora_shared::types::LeaseId;
use thiserror::Error;

/// Errors that can occur resolving or appending lease terms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    /// No term's effective interval contains the target date.
    #[error("No term found for lease {lease_id} on {date}")]
    NoTermFound {
        /// The lease whose history was searched.
        lease_id: LeaseId,
        /// The date with no covering term.
        date: NaiveDate,
    },

    /// A new term's effective interval overlaps an existing one.
    #[error("Term effective from {new_from} overlaps term effective from {existing_from}")]
    OverlappingTerms {
        /// Effective-from of the term already in history.
        existing_from: NaiveDate,
        /// Effective-from of the rejected term.
        new_from: NaiveDate,
    },

    /// A term's effective-to is not strictly after its effective-from.
    #[error("Term interval [{from}, {to}) is empty or inverted")]
    InvalidInterval {
        /// Effective-from of the rejected term.
        from: NaiveDate,
        /// Effective-to of the rejected term.
        to: NaiveDate,
    },
}

impl TermError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoTermFound { .. } => "NO_TERM_FOUND",
            Self::OverlappingTerms { .. } => "OVERLAPPING_TERMS",
            Self::InvalidInterval { .. } => "INVALID_TERM_INTERVAL",
        }
    }
}
