//! Run and store error types.

use rentora_shared::types::LeaseId;
use thiserror::Error;

use crate::invoice::BillingPeriod;

/// Errors surfaced by the persistence port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The (lease, period) uniqueness constraint rejected an insert; a
    /// concurrent writer already billed this period.
    #[error("A non-void invoice already exists for lease {lease_id} in period {period}")]
    DuplicateInvoice {
        /// The lease concerned.
        lease_id: LeaseId,
        /// The contested billing period.
        period: BillingPeriod,
    },

    /// A referenced lease does not exist.
    #[error("Lease {0} not found")]
    LeaseNotFound(LeaseId),

    /// Persistence or connectivity failure.
    #[error("Storage failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// True for the optimistic-concurrency loss a caller may retry around.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateInvoice { .. })
    }
}

/// Run-level faults that prevent a batch from producing a summary.
///
/// Per-lease assembly failures are never raised here; they are recorded on
/// the run items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Persisting the run record itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of a single-lease, request-driven invoice generation.
///
/// Unlike batch items, the caller gets the typed cause back so it can
/// distinguish a correctable input from a retryable conflict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// Invoice assembly rejected the lease's data.
    #[error(transparent)]
    Assembly(#[from] crate::invoice::AssemblyError),

    /// Loading inputs or persisting the invoice failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GenerateError {
    /// True for the optimistic-concurrency loss a caller may retry around.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_conflict())
    }
}
