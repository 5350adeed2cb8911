//! Invoice state transitions.
//!
//! One function per edge, mirroring the lease lifecycle: every mutation
//! takes the expected concurrency token and returns the invoice with the
//! token bumped.

use rentora_shared::types::ConcurrencyToken;
use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::types::{Invoice, InvoiceStatus};

/// Stateless service for invoice lifecycle transitions.
pub struct InvoiceLifecycle;

impl InvoiceLifecycle {
    /// Issue a draft invoice (Draft → Issued).
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvalidTransition` if the invoice is not a
    /// draft, `ConcurrencyConflict` on a stale token.
    pub fn issue(
        invoice: &Invoice,
        expected_version: ConcurrencyToken,
    ) -> Result<Invoice, InvoiceError> {
        Self::check_version(invoice, expected_version)?;
        if invoice.status != InvoiceStatus::Draft {
            return Err(InvoiceError::InvalidTransition {
                from: invoice.status,
                to: InvoiceStatus::Issued,
            });
        }
        Ok(Self::with_status(invoice, InvoiceStatus::Issued))
    }

    /// Record a payment against an issued invoice.
    ///
    /// Moves to Paid when the balance reaches zero, PartiallyPaid
    /// otherwise. Overpayment is rejected; refunds go through credit
    /// notes, not negative balances.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvalidTransition` when the status does not
    /// accept payments, `NonPositivePayment` or `OverPayment` for bad
    /// amounts, `ConcurrencyConflict` on a stale token.
    pub fn record_payment(
        invoice: &Invoice,
        expected_version: ConcurrencyToken,
        payment: Decimal,
    ) -> Result<Invoice, InvoiceError> {
        Self::check_version(invoice, expected_version)?;
        if !invoice.status.accepts_payment() {
            return Err(InvoiceError::InvalidTransition {
                from: invoice.status,
                to: InvoiceStatus::PartiallyPaid,
            });
        }
        if payment <= Decimal::ZERO {
            return Err(InvoiceError::NonPositivePayment { amount: payment });
        }
        if payment > invoice.balance_amount {
            return Err(InvoiceError::OverPayment {
                payment,
                balance: invoice.balance_amount,
            });
        }

        let paid = invoice.paid_amount + payment;
        let balance = invoice.total_amount - paid;
        let status = if balance.is_zero() {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::PartiallyPaid
        };

        let mut updated = Self::with_status(invoice, status);
        updated.paid_amount = paid;
        updated.balance_amount = balance;
        Ok(updated)
    }

    /// Void an unpaid invoice (Draft | Issued → Void).
    ///
    /// Voided invoices stop counting toward the duplicate-billing guard;
    /// partially or fully paid invoices are corrected with credit notes
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::VoidReasonRequired` for an empty reason,
    /// `InvalidTransition` from any paid state, `ConcurrencyConflict` on a
    /// stale token.
    pub fn void(
        invoice: &Invoice,
        expected_version: ConcurrencyToken,
        reason: &str,
    ) -> Result<Invoice, InvoiceError> {
        Self::check_version(invoice, expected_version)?;
        if reason.trim().is_empty() {
            return Err(InvoiceError::VoidReasonRequired);
        }
        match invoice.status {
            InvoiceStatus::Draft | InvoiceStatus::Issued => {
                Ok(Self::with_status(invoice, InvoiceStatus::Void))
            }
            _ => Err(InvoiceError::InvalidTransition {
                from: invoice.status,
                to: InvoiceStatus::Void,
            }),
        }
    }

    fn check_version(
        invoice: &Invoice,
        expected: ConcurrencyToken,
    ) -> Result<(), InvoiceError> {
        if invoice.version != expected {
            return Err(InvoiceError::ConcurrencyConflict {
                expected,
                actual: invoice.version,
            });
        }
        Ok(())
    }

    fn with_status(invoice: &Invoice, status: InvoiceStatus) -> Invoice {
        let mut updated = invoice.clone();
        updated.status = status;
        updated.version = invoice.version.next();
        updated
    }
}
