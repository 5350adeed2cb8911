//! Invoice domain types.

use chrono::NaiveDate;
use rentora_shared::types::{
    ConcurrencyToken, CreditNoteId, Currency, InvoiceId, InvoiceLineId, LeaseId, LeaseTermId,
    Money, OrganizationId, UtilityStatementId,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::utility::UtilityType;

/// An inclusive billing period `[start, end]` within one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    /// First day billed (inclusive).
    pub start: NaiveDate,
    /// Last day billed (inclusive).
    pub end: NaiveDate,
}

/// The period's bounds are inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Billing period end {end} precedes start {start}")]
pub struct InvalidBillingPeriod {
    /// Requested period start.
    pub start: NaiveDate,
    /// Requested period end.
    pub end: NaiveDate,
}

impl BillingPeriod {
    /// Creates a period, rejecting inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBillingPeriod` if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidBillingPeriod> {
        if end < start {
            return Err(InvalidBillingPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of days covered, inclusive of both bounds.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// True if the given date falls within the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Source category of an invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "utility")]
pub enum ChargeType {
    /// Monthly rent from the resolved term.
    Rent,
    /// Recurring maintenance charge from the resolved term.
    Maintenance,
    /// Other recurring fixed charge from the resolved term.
    FixedCharge,
    /// Metered or pass-through utility charge.
    Utility(UtilityType),
    /// Prior-period adjustment (correction or carried credit).
    Adjustment,
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rent => write!(f, "rent"),
            Self::Maintenance => write!(f, "maintenance"),
            Self::FixedCharge => write!(f, "fixed_charge"),
            Self::Utility(utility) => write!(f, "utility_{utility}"),
            Self::Adjustment => write!(f, "adjustment"),
        }
    }
}

/// Invoice status.
///
/// The valid transitions are:
/// - Draft → Issued (issue)
/// - Issued → PartiallyPaid | Paid (record payment)
/// - PartiallyPaid → PartiallyPaid | Paid (record payment)
/// - Draft | Issued → Void (void)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Assembled but not yet sent to the tenant.
    Draft,
    /// Sent; awaiting payment.
    Issued,
    /// Partially settled.
    PartiallyPaid,
    /// Fully settled (immutable).
    Paid,
    /// Voided; excluded from balances and duplicate-billing checks.
    Void,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Issued => "issued",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Void => "void",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "issued" => Some(Self::Issued),
            "partially_paid" => Some(Self::PartiallyPaid),
            "paid" => Some(Self::Paid),
            "void" => Some(Self::Void),
            _ => None,
        }
    }

    /// True if the invoice still counts toward the duplicate-billing guard.
    #[must_use]
    pub const fn counts_for_period(self) -> bool {
        !matches!(self, Self::Void)
    }

    /// True if payments may still be recorded.
    #[must_use]
    pub const fn accepts_payment(self) -> bool {
        matches!(self, Self::Issued | Self::PartiallyPaid)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One charge on an invoice, traceable back to its source record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Unique identifier.
    pub id: InvoiceLineId,
    /// Source category.
    pub charge_type: ChargeType,
    /// Human-readable description.
    pub description: String,
    /// Units billed: 1 for flat charges, consumed units for metered ones.
    pub quantity: Decimal,
    /// Per-unit rate where uniform; zero for tiered slab pricing, whose
    /// math lives in the rate plan.
    pub unit_price: Decimal,
    /// Pre-tax line amount.
    pub amount: Decimal,
    /// Tax rate percentage applied to this line (zero when untaxed).
    pub tax_rate: Decimal,
    /// Tax charged on this line.
    pub tax_amount: Decimal,
    /// `amount + tax_amount`.
    pub total: Decimal,
    /// Term the charge derives from, if any.
    pub source_term_id: Option<LeaseTermId>,
    /// Utility statement the charge derives from, if any.
    pub source_statement_id: Option<UtilityStatementId>,
    /// Credit note the adjustment derives from, if any.
    pub source_credit_note_id: Option<CreditNoteId>,
}

impl InvoiceLine {
    /// Applies a tax rate to the pre-tax amount, filling the tax and total
    /// fields. Tax is rounded per line with banker's rounding.
    #[must_use]
    pub fn with_tax(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self.tax_amount = (self.amount * tax_rate / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        self.total = self.amount + self.tax_amount;
        self
    }
}

/// A bill for one lease and one billing period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Organization owning the invoice.
    pub organization_id: OrganizationId,
    /// Lease billed.
    pub lease_id: LeaseId,
    /// Human-facing invoice number.
    pub number: String,
    /// Current status.
    pub status: InvoiceStatus,
    /// Period billed.
    pub period: BillingPeriod,
    /// Date the invoice was created.
    pub issue_date: NaiveDate,
    /// Date payment falls due.
    pub due_date: NaiveDate,
    /// Currency of every amount on the invoice.
    pub currency: Currency,
    /// Ordered charge lines.
    pub lines: Vec<InvoiceLine>,
    /// Sum of pre-tax line amounts.
    pub sub_total: Decimal,
    /// Sum of line tax amounts.
    pub tax_amount: Decimal,
    /// `sub_total + tax_amount`.
    pub total_amount: Decimal,
    /// Amount settled so far.
    pub paid_amount: Decimal,
    /// `total_amount - paid_amount`.
    pub balance_amount: Decimal,
    /// Optimistic-concurrency token.
    pub version: ConcurrencyToken,
}

impl Invoice {
    /// Recomputes the totals from the lines, leaving `paid_amount` as is.
    pub fn recompute_totals(&mut self) {
        self.sub_total = self.lines.iter().map(|l| l.amount).sum();
        self.tax_amount = self.lines.iter().map(|l| l.tax_amount).sum();
        self.total_amount = self.sub_total + self.tax_amount;
        self.balance_amount = self.total_amount - self.paid_amount;
    }

    /// Finds a line by id.
    #[must_use]
    pub fn line(&self, id: InvoiceLineId) -> Option<&InvoiceLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// The invoice total as money.
    #[must_use]
    pub const fn total(&self) -> Money {
        Money::new(self.total_amount, self.currency)
    }

    /// The outstanding balance as money.
    #[must_use]
    pub const fn balance(&self) -> Money {
        Money::new(self.balance_amount, self.currency)
    }
}
