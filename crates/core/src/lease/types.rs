//! Lease domain types.

use chrono::NaiveDate;
use rentora_shared::types::{ConcurrencyToken, Currency, LeaseId, OrganizationId, TenantId, UnitId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::proration::ProrationMethod;

/// Lease status in the lifecycle state machine.
///
/// The valid transitions are:
/// - Draft → Active (activate, via the validation gate)
/// - Draft → Cancelled (cancel)
/// - Active → NoticeGiven (give notice)
/// - Active → Ended (end)
/// - NoticeGiven → Ended (end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaseStatus {
    /// Lease is being drafted; parties and terms may still change.
    Draft,
    /// Lease is legally active and billable.
    Active,
    /// Termination notice has been given; an end date is set.
    NoticeGiven,
    /// Lease has ended (immutable).
    Ended,
    /// Lease was cancelled before activation (immutable).
    Cancelled,
}

impl LeaseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::NoticeGiven => "notice_given",
            Self::Ended => "ended",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "notice_given" => Some(Self::NoticeGiven),
            "ended" => Some(Self::Ended),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if invoices may be generated for the lease.
    #[must_use]
    pub const fn is_billable(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns true if no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}

impl fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of a tenant on a lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    /// The lead tenant; every activatable lease needs at least one.
    PrimaryTenant,
    /// Additional tenant sharing the lease.
    CoTenant,
    /// Guarantees payment without occupying the unit.
    Guarantor,
    /// Occupies the unit without contractual responsibility.
    Occupant,
}

/// A tenant's participation on a lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseParty {
    /// The lease.
    pub lease_id: LeaseId,
    /// The tenant.
    pub tenant_id: TenantId,
    /// The tenant's role on this lease.
    pub role: PartyRole,
    /// True if this party is responsible for paying invoices.
    pub is_payment_responsible: bool,
}

/// Late fee assessed after the grace period, owned by the dunning layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum LateFeePolicy {
    /// No late fee.
    None,
    /// Flat amount per late invoice.
    Fixed {
        /// The flat fee.
        amount: Decimal,
    },
    /// Percentage of the invoice's rent line.
    PercentOfRent {
        /// The percentage (e.g., 2 for 2%).
        percent: Decimal,
    },
}

/// A contract binding a tenant party set to a unit.
///
/// Mutated only through explicit lifecycle operations; every mutation takes
/// the expected concurrency token and bumps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lease {
    /// Unique identifier.
    pub id: LeaseId,
    /// Organization owning the lease.
    pub organization_id: OrganizationId,
    /// The rented unit.
    pub unit_id: UnitId,
    /// Current lifecycle status.
    pub status: LeaseStatus,
    /// First day of the lease.
    pub start_date: NaiveDate,
    /// Last day of the lease, if bounded.
    pub end_date: Option<NaiveDate>,
    /// Day of month rent falls due (1-28, so it exists in every month).
    pub rent_due_day: u8,
    /// Days after the due date before an invoice counts as late.
    pub grace_days: u8,
    /// Late fee assessed after the grace period.
    pub late_fee_policy: LateFeePolicy,
    /// True if the lease renews automatically at end date.
    pub auto_renew: bool,
    /// Currency all of this lease's charges are denominated in.
    pub currency: Currency,
    /// Optimistic-concurrency token.
    pub version: ConcurrencyToken,
}

/// Per-lease invoice generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseBillingSetting {
    /// The lease these settings belong to.
    pub lease_id: LeaseId,
    /// Day of month invoices are generated (1-28).
    pub billing_day: u8,
    /// Days between issue and due date.
    pub payment_term_days: u16,
    /// True if the batch run may generate invoices for this lease.
    pub generate_invoice_automatically: bool,
    /// Proration policy for partial periods.
    pub proration_method: ProrationMethod,
    /// Invoice number prefix; falls back to configuration when absent.
    pub invoice_number_prefix: Option<String>,
}
