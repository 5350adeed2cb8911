//! Invoice error types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::InvoiceStatus;
use crate::lease::LeaseStatus;
use crate::proration::ProrationError;
use crate::term::TermError;
use crate::utility::{RatePlanError, StatementError, UtilityType};
use rentora_shared::types::{ConcurrencyToken, InvoiceLineId};

/// Errors that can abort assembling an invoice.
///
/// Assembly is all-or-nothing: any component failure propagates here and
/// no partial invoice is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// The lease is not in a billable status.
    #[error("Lease is not billable in status {status}")]
    LeaseNotBillable {
        /// The lease's current status.
        status: LeaseStatus,
    },

    /// Term resolution failed.
    #[error(transparent)]
    Term(#[from] TermError),

    /// Proration failed.
    #[error(transparent)]
    Proration(#[from] ProrationError),

    /// The rate plan rejected the consumption or was malformed.
    #[error(transparent)]
    RatePlan(#[from] RatePlanError),

    /// A statement carried inconsistent meter readings.
    #[error(transparent)]
    Statement(#[from] StatementError),

    /// A finalized metered statement has no rate plan to price it.
    #[error("No rate plan available for utility type {utility_type}")]
    MissingRatePlan {
        /// The unpriceable utility type.
        utility_type: UtilityType,
    },
}

impl AssemblyError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::LeaseNotBillable { .. } => "LEASE_NOT_BILLABLE",
            Self::Term(_) => "NO_TERM_FOUND",
            Self::Proration(_) => "INVALID_PRORATION_RANGE",
            Self::RatePlan(_) => "INVALID_RATE_PLAN",
            Self::Statement(_) => "INVALID_STATEMENT",
            Self::MissingRatePlan { .. } => "MISSING_RATE_PLAN",
        }
    }
}

/// Errors raised by invoice lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    /// Attempted an edge the status machine does not define.
    #[error("Invalid invoice transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: InvoiceStatus,
        /// The attempted target status.
        to: InvoiceStatus,
    },

    /// A payment must be strictly positive.
    #[error("Payment amount {amount} is not positive")]
    NonPositivePayment {
        /// The rejected amount.
        amount: Decimal,
    },

    /// A payment may not exceed the outstanding balance.
    #[error("Payment {payment} exceeds outstanding balance {balance}")]
    OverPayment {
        /// The rejected payment.
        payment: Decimal,
        /// The outstanding balance.
        balance: Decimal,
    },

    /// Voiding requires a reason.
    #[error("Void reason is required")]
    VoidReasonRequired,

    /// The caller's concurrency token is stale.
    #[error("Invoice version {actual} does not match expected {expected}")]
    ConcurrencyConflict {
        /// The token the caller supplied.
        expected: ConcurrencyToken,
        /// The invoice's current token.
        actual: ConcurrencyToken,
    },
}

/// Errors raised while issuing a credit note.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreditNoteError {
    /// Credit notes can only target issued (or later) invoices.
    #[error("Cannot credit an invoice in status {status}")]
    InvoiceNotCreditable {
        /// The invoice's current status.
        status: InvoiceStatus,
    },

    /// The credit note carries no lines.
    #[error("Credit note has no lines")]
    EmptyCreditNote,

    /// A credited line does not exist on the invoice.
    #[error("Invoice line {line_id} not found")]
    LineNotFound {
        /// The missing line.
        line_id: InvoiceLineId,
    },

    /// A credit amount must be strictly positive.
    #[error("Credit amount {amount} is not positive")]
    NonPositiveCredit {
        /// The rejected amount.
        amount: Decimal,
    },

    /// Cumulative credits may not exceed the line's total.
    #[error("Credit {requested} exceeds remaining creditable {available} on line {line_id}")]
    ExceedsLineAmount {
        /// The targeted line.
        line_id: InvoiceLineId,
        /// The requested credit.
        requested: Decimal,
        /// What is still creditable.
        available: Decimal,
    },

    /// A credit note needs a reason.
    #[error("Credit note reason is required")]
    ReasonRequired,
}
