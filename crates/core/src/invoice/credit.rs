//! Credit notes.
//!
//! Refunds and corrections never mutate an invoice line; they are recorded
//! as credit notes against specific lines, capped so a line can never be
//! credited past its total.

use chrono::{DateTime, Utc};
use rentora_shared::types::{CreditNoteId, InvoiceId, InvoiceLineId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CreditNoteError;
use super::types::{Invoice, InvoiceStatus};
use crate::clock::Clock;

/// One credited amount against one invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditNoteLine {
    /// The invoice line credited.
    pub invoice_line_id: InvoiceLineId,
    /// Amount credited (positive).
    pub amount: Decimal,
}

/// An adjustment document against a specific invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditNote {
    /// Unique identifier.
    pub id: CreditNoteId,
    /// The invoice adjusted.
    pub invoice_id: InvoiceId,
    /// Why the credit was issued.
    pub reason: String,
    /// Credited amounts per line.
    pub lines: Vec<CreditNoteLine>,
    /// Sum of the credited amounts.
    pub total: Decimal,
    /// When the credit note was issued.
    pub issued_at: DateTime<Utc>,
}

/// A requested credit against one invoice line.
#[derive(Debug, Clone, Copy)]
pub struct CreditRequest {
    /// The invoice line to credit.
    pub invoice_line_id: InvoiceLineId,
    /// Amount to credit (must be positive).
    pub amount: Decimal,
}

/// Issues a credit note against an invoice.
///
/// The invoice itself is untouched; `existing` carries the credit notes
/// already issued against it so cumulative credits per line can be capped
/// at the line's total (tax included).
///
/// # Errors
///
/// Returns a [`CreditNoteError`] when the invoice is still a draft or
/// void, the request is empty, a line is unknown, an amount is not
/// positive, or a line's remaining creditable amount is exceeded.
pub fn issue_credit_note(
    invoice: &Invoice,
    existing: &[CreditNote],
    requests: &[CreditRequest],
    reason: String,
    clock: &dyn Clock,
) -> Result<CreditNote, CreditNoteError> {
    if !matches!(
        invoice.status,
        InvoiceStatus::Issued | InvoiceStatus::PartiallyPaid | InvoiceStatus::Paid
    ) {
        return Err(CreditNoteError::InvoiceNotCreditable {
            status: invoice.status,
        });
    }
    if reason.trim().is_empty() {
        return Err(CreditNoteError::ReasonRequired);
    }
    if requests.is_empty() {
        return Err(CreditNoteError::EmptyCreditNote);
    }

    let mut lines = Vec::with_capacity(requests.len());
    for request in requests {
        let line = invoice
            .line(request.invoice_line_id)
            .ok_or(CreditNoteError::LineNotFound {
                line_id: request.invoice_line_id,
            })?;
        if request.amount <= Decimal::ZERO {
            return Err(CreditNoteError::NonPositiveCredit {
                amount: request.amount,
            });
        }

        let already_credited: Decimal = existing
            .iter()
            .filter(|note| note.invoice_id == invoice.id)
            .flat_map(|note| &note.lines)
            .filter(|credited| credited.invoice_line_id == request.invoice_line_id)
            .map(|credited| credited.amount)
            .sum();
        let available = line.total - already_credited;
        if request.amount > available {
            return Err(CreditNoteError::ExceedsLineAmount {
                line_id: request.invoice_line_id,
                requested: request.amount,
                available,
            });
        }

        lines.push(CreditNoteLine {
            invoice_line_id: request.invoice_line_id,
            amount: request.amount,
        });
    }

    let total = lines.iter().map(|l| l.amount).sum();
    Ok(CreditNote {
        id: CreditNoteId::new(),
        invoice_id: invoice.id,
        reason,
        lines,
        total,
        issued_at: clock.now_utc(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::invoice::types::{BillingPeriod, ChargeType, InvoiceLine};
    use chrono::NaiveDate;
    use rentora_shared::types::{ConcurrencyToken, Currency, LeaseId, OrganizationId};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::at_midnight(date(2026, 7, 1))
    }

    fn issued_invoice() -> Invoice {
        let line = InvoiceLine {
            id: InvoiceLineId::new(),
            charge_type: ChargeType::Rent,
            description: "Rent".to_string(),
            quantity: dec!(1),
            unit_price: dec!(1000),
            amount: dec!(1000),
            tax_rate: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            source_term_id: None,
            source_statement_id: None,
            source_credit_note_id: None,
        }
        .with_tax(dec!(10));

        let mut invoice = Invoice {
            id: InvoiceId::new(),
            organization_id: OrganizationId::new(),
            lease_id: LeaseId::new(),
            number: "INV-202606-000001".to_string(),
            status: InvoiceStatus::Issued,
            period: BillingPeriod::new(date(2026, 6, 1), date(2026, 6, 30)).unwrap(),
            issue_date: date(2026, 6, 1),
            due_date: date(2026, 6, 15),
            currency: Currency::Usd,
            lines: vec![line],
            sub_total: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            balance_amount: Decimal::ZERO,
            version: ConcurrencyToken::initial(),
        };
        invoice.recompute_totals();
        invoice
    }

    #[test]
    fn test_issue_credit_note() {
        let invoice = issued_invoice();
        let line_id = invoice.lines[0].id;

        let note = issue_credit_note(
            &invoice,
            &[],
            &[CreditRequest {
                invoice_line_id: line_id,
                amount: dec!(200),
            }],
            "Broken heating for a week".to_string(),
            &clock(),
        )
        .unwrap();

        assert_eq!(note.invoice_id, invoice.id);
        assert_eq!(note.total, dec!(200));
        assert_eq!(note.lines.len(), 1);
        // The invoice line is untouched.
        assert_eq!(invoice.lines[0].total, dec!(1100.00));
    }

    #[test]
    fn test_cumulative_credits_capped_at_line_total() {
        let invoice = issued_invoice();
        let line_id = invoice.lines[0].id;
        let first = issue_credit_note(
            &invoice,
            &[],
            &[CreditRequest {
                invoice_line_id: line_id,
                amount: dec!(900),
            }],
            "partial refund".to_string(),
            &clock(),
        )
        .unwrap();

        // Line total is 1100.00; only 200.00 remains creditable.
        let result = issue_credit_note(
            &invoice,
            &[first],
            &[CreditRequest {
                invoice_line_id: line_id,
                amount: dec!(300),
            }],
            "second refund".to_string(),
            &clock(),
        );
        assert!(matches!(
            result,
            Err(CreditNoteError::ExceedsLineAmount { .. })
        ));
    }

    #[test]
    fn test_unknown_line_rejected() {
        let invoice = issued_invoice();
        let result = issue_credit_note(
            &invoice,
            &[],
            &[CreditRequest {
                invoice_line_id: InvoiceLineId::new(),
                amount: dec!(10),
            }],
            "typo".to_string(),
            &clock(),
        );
        assert!(matches!(result, Err(CreditNoteError::LineNotFound { .. })));
    }

    #[test]
    fn test_draft_invoice_not_creditable() {
        let mut invoice = issued_invoice();
        invoice.status = InvoiceStatus::Draft;
        let result = issue_credit_note(&invoice, &[], &[], "reason".to_string(), &clock());
        assert!(matches!(
            result,
            Err(CreditNoteError::InvoiceNotCreditable { .. })
        ));
    }

    #[test]
    fn test_empty_request_rejected() {
        let invoice = issued_invoice();
        let result = issue_credit_note(&invoice, &[], &[], "reason".to_string(), &clock());
        assert!(matches!(result, Err(CreditNoteError::EmptyCreditNote)));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let invoice = issued_invoice();
        let line_id = invoice.lines[0].id;
        let result = issue_credit_note(
            &invoice,
            &[],
            &[CreditRequest {
                invoice_line_id: line_id,
                amount: dec!(0),
            }],
            "reason".to_string(),
            &clock(),
        );
        assert!(matches!(
            result,
            Err(CreditNoteError::NonPositiveCredit { .. })
        ));
    }

    #[test]
    fn test_reason_required() {
        let invoice = issued_invoice();
        let line_id = invoice.lines[0].id;
        let result = issue_credit_note(
            &invoice,
            &[],
            &[CreditRequest {
                invoice_line_id: line_id,
                amount: dec!(10),
            }],
            "  ".to_string(),
            &clock(),
        );
        assert!(matches!(result, Err(CreditNoteError::ReasonRequired)));
    }
}
