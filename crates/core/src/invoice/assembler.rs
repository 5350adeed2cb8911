//! Building one invoice for one lease and one billing period.
//!
//! The caller loads everything the invoice depends on into an
//! [`AssemblyContext`]; assembly itself is pure. Term resolution happens
//! before proration and rate computation, since the derived amounts depend
//! on the resolved term.

use std::collections::HashMap;

use chrono::Days;
use rentora_shared::types::{ConcurrencyToken, CreditNoteId, InvoiceId, InvoiceLineId};
use rust_decimal::Decimal;

use super::error::AssemblyError;
use super::types::{BillingPeriod, ChargeType, Invoice, InvoiceLine, InvoiceStatus};
use crate::clock::Clock;
use crate::lease::{Lease, LeaseBillingSetting};
use crate::proration::prorate;
use crate::term::{rent_on, TermHistory};
use crate::utility::{UtilityCharge, UtilityStatement, UtilityType, ValidatedRatePlan};

/// A correction or carried credit billed into this period.
#[derive(Debug, Clone)]
pub struct PriorAdjustment {
    /// Human-readable description.
    pub description: String,
    /// Adjustment amount; negative for credits.
    pub amount: Decimal,
    /// Credit note the adjustment derives from, if any.
    pub source_credit_note_id: Option<CreditNoteId>,
}

/// Everything invoice assembly depends on, loaded up front.
#[derive(Debug, Clone)]
pub struct AssemblyContext {
    /// The lease billed; must be Active.
    pub lease: Lease,
    /// The lease's billing settings.
    pub billing: LeaseBillingSetting,
    /// The lease's term history.
    pub terms: TermHistory,
    /// Utility statements overlapping the period (any revision; assembly
    /// bills only final ones matching the period exactly).
    pub statements: Vec<UtilityStatement>,
    /// Validated rate plans by utility type.
    pub rate_plans: HashMap<UtilityType, ValidatedRatePlan>,
    /// Prior-period adjustments to bill into this period.
    pub adjustments: Vec<PriorAdjustment>,
}

/// Assembles a Draft invoice for the context's lease over the given period.
///
/// Produces one line per charge source: rent (escalation-aware, prorated on
/// partial coverage), recurring fixed charges from the same term, one line
/// per finalized utility statement, and one line per prior-period
/// adjustment. Tax is applied per line from `tax_rate_for`; `None` means
/// the charge type is untaxed.
///
/// The charged day range is the period clamped to the lease's own start
/// and end dates, so a mid-month move-in bills only the occupied days.
///
/// # Errors
///
/// Any component failure propagates as an [`AssemblyError`]; no partial
/// invoice is ever returned.
pub fn assemble<F>(
    ctx: &AssemblyContext,
    period: BillingPeriod,
    invoice_number: String,
    tax_rate_for: F,
    clock: &dyn Clock,
) -> Result<Invoice, AssemblyError>
where
    F: Fn(ChargeType) -> Option<Decimal>,
{
    if !ctx.lease.status.is_billable() {
        return Err(AssemblyError::LeaseNotBillable {
            status: ctx.lease.status,
        });
    }

    // Clamp the billed day range to the lease's own bounds.
    let charge_from = period.start.max(ctx.lease.start_date);
    let last_billed = ctx
        .lease
        .end_date
        .map_or(period.end, |end| period.end.min(end));
    let charge_to = last_billed
        .checked_add_days(Days::new(1))
        .expect("date has a successor")
        .max(charge_from);

    let term = ctx.terms.resolve(ctx.lease.id, charge_from)?;
    let method = ctx.billing.proration_method;

    let mut lines = Vec::new();

    // Rent, escalated to the charge date and prorated over the range.
    let monthly_rent = rent_on(term, charge_from);
    let rent_amount = prorate(monthly_rent, charge_from, charge_to, method)?;
    let mut rent_line = flat_line(ChargeType::Rent, format!("Rent {period}"), rent_amount);
    rent_line.source_term_id = Some(term.id);
    lines.push(rent_line);

    // Recurring fixed charges from the same resolved term, prorated
    // identically.
    if let Some(maintenance) = term.maintenance_charge {
        let amount = prorate(maintenance, charge_from, charge_to, method)?;
        let mut line = flat_line(ChargeType::Maintenance, "Maintenance".to_string(), amount);
        line.source_term_id = Some(term.id);
        lines.push(line);
    }
    if let Some(fixed) = term.other_fixed_charge {
        let amount = prorate(fixed, charge_from, charge_to, method)?;
        let mut line = flat_line(ChargeType::FixedCharge, "Fixed charge".to_string(), amount);
        line.source_term_id = Some(term.id);
        lines.push(line);
    }

    // One line per finalized statement matching the period.
    for statement in &ctx.statements {
        if !statement.is_final || !statement.matches_period(period.start, period.end) {
            continue;
        }
        lines.push(utility_line(ctx, statement)?);
    }

    // Prior-period adjustments.
    for adjustment in &ctx.adjustments {
        let mut line = flat_line(
            ChargeType::Adjustment,
            adjustment.description.clone(),
            adjustment.amount,
        );
        line.source_credit_note_id = adjustment.source_credit_note_id;
        lines.push(line);
    }

    let lines: Vec<InvoiceLine> = lines
        .into_iter()
        .map(|line| {
            let rate = tax_rate_for(line.charge_type).unwrap_or(Decimal::ZERO);
            line.with_tax(rate)
        })
        .collect();

    let issue_date = clock.today();
    let due_date = issue_date
        .checked_add_days(Days::new(u64::from(ctx.billing.payment_term_days)))
        .expect("due date within chrono range");

    let mut invoice = Invoice {
        id: InvoiceId::new(),
        organization_id: ctx.lease.organization_id,
        lease_id: ctx.lease.id,
        number: invoice_number,
        status: InvoiceStatus::Draft,
        period,
        issue_date,
        due_date,
        currency: ctx.lease.currency,
        lines,
        sub_total: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total_amount: Decimal::ZERO,
        paid_amount: Decimal::ZERO,
        balance_amount: Decimal::ZERO,
        version: ConcurrencyToken::initial(),
    };
    invoice.recompute_totals();
    Ok(invoice)
}

fn utility_line(
    ctx: &AssemblyContext,
    statement: &UtilityStatement,
) -> Result<InvoiceLine, AssemblyError> {
    let charge_type = ChargeType::Utility(statement.utility_type);
    let mut line = match statement.charge {
        UtilityCharge::MeterReading { .. } => {
            let consumed = statement
                .consumed_units()?
                .expect("meter statements always yield consumption");
            let plan = ctx.rate_plans.get(&statement.utility_type).ok_or(
                AssemblyError::MissingRatePlan {
                    utility_type: statement.utility_type,
                },
            )?;
            let amount = plan.charge_for(consumed)?;
            let mut line = flat_line(
                charge_type,
                format!("{} ({consumed} units)", statement.utility_type),
                amount,
            );
            line.quantity = consumed;
            // Tiered pricing has no single per-unit rate.
            line.unit_price = Decimal::ZERO;
            line
        }
        UtilityCharge::ProviderAmount(amount) => flat_line(
            charge_type,
            format!("{} (provider billed)", statement.utility_type),
            amount,
        ),
    };

    line.source_statement_id = Some(statement.id);
    Ok(line)
}

fn flat_line(charge_type: ChargeType, description: String, amount: Decimal) -> InvoiceLine {
    InvoiceLine {
        id: InvoiceLineId::new(),
        charge_type,
        description,
        quantity: Decimal::ONE,
        unit_price: amount,
        amount,
        tax_rate: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total: Decimal::ZERO,
        source_term_id: None,
        source_statement_id: None,
        source_credit_note_id: None,
    }
}
