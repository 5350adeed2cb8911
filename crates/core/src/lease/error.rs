//! Lease lifecycle error types.

use chrono::NaiveDate;
use rentora_shared::types::{ConcurrencyToken, UnitId};
use thiserror::Error;

use super::types::LeaseStatus;

/// Errors that can abort the Draft → Active activation gate.
///
/// Checks are evaluated in a fixed order and the first failure wins; no
/// partial activation ever takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// The lease is not in Draft status.
    #[error("Lease cannot be activated from status {current}")]
    InvalidLeaseState {
        /// The lease's current status.
        current: LeaseStatus,
    },

    /// The unit already has another active lease on the start date.
    #[error("Unit {unit_id} already has an active lease on the start date")]
    UnitAlreadyOccupied {
        /// The contested unit.
        unit_id: UnitId,
    },

    /// No party carries the Primary Tenant role.
    #[error("Lease has no primary tenant")]
    MissingPrimaryTenant,

    /// No party is flagged payment-responsible.
    #[error("Lease has no payment-responsible party")]
    NoPayerDesignated,

    /// No term's effective interval contains the lease start date.
    #[error("No term covers the lease start date {start_date}")]
    NoTermForStartDate {
        /// The uncovered start date.
        start_date: NaiveDate,
    },

    /// Rent due day is outside [1, 28].
    #[error("Rent due day {day} is outside 1-28")]
    InvalidRentDueDay {
        /// The rejected day.
        day: u8,
    },

    /// End date is not strictly after the start date.
    #[error("End date {end} is not after start date {start}")]
    InvalidDateRange {
        /// The lease start date.
        start: NaiveDate,
        /// The rejected end date.
        end: NaiveDate,
    },

    /// The caller's concurrency token is stale.
    #[error("Lease version {actual} does not match expected {expected}")]
    ConcurrencyConflict {
        /// The token the caller supplied.
        expected: ConcurrencyToken,
        /// The lease's current token.
        actual: ConcurrencyToken,
    },
}

impl ActivationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidLeaseState { .. } => "INVALID_LEASE_STATE",
            Self::UnitAlreadyOccupied { .. } => "UNIT_ALREADY_OCCUPIED",
            Self::MissingPrimaryTenant => "MISSING_PRIMARY_TENANT",
            Self::NoPayerDesignated => "NO_PAYER_DESIGNATED",
            Self::NoTermForStartDate { .. } => "NO_TERM_FOR_START_DATE",
            Self::InvalidRentDueDay { .. } => "INVALID_RENT_DUE_DAY",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidLeaseState { .. } => 422,
            Self::ConcurrencyConflict { .. } | Self::UnitAlreadyOccupied { .. } => 409,
            _ => 400,
        }
    }
}

/// Errors for the non-activation lifecycle edges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Attempted an edge the state machine does not define.
    #[error("Invalid lease transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: LeaseStatus,
        /// The attempted target status.
        to: LeaseStatus,
    },

    /// End date is not strictly after the start date.
    #[error("End date {end} is not after start date {start}")]
    EndDateBeforeStart {
        /// The lease start date.
        start: NaiveDate,
        /// The rejected end date.
        end: NaiveDate,
    },

    /// The caller's concurrency token is stale.
    #[error("Lease version {actual} does not match expected {expected}")]
    ConcurrencyConflict {
        /// The token the caller supplied.
        expected: ConcurrencyToken,
        /// The lease's current token.
        actual: ConcurrencyToken,
    },
}

impl TransitionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::EndDateBeforeStart { .. } => "INVALID_DATE_RANGE",
            Self::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
        }
    }
}
