//! Utility billing domain types.

use chrono::NaiveDate;
use rentora_shared::types::{LeaseId, OrganizationId, RatePlanId, UtilityStatementId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::StatementError;

/// Metered utility categories billed through the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilityType {
    /// Electricity consumption.
    Electricity,
    /// Water consumption.
    Water,
    /// Piped gas consumption.
    Gas,
    /// Sewage / drainage service.
    Sewage,
    /// Internet service.
    Internet,
}

impl UtilityType {
    /// Returns the string representation of the utility type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Water => "water",
            Self::Gas => "gas",
            Self::Sewage => "sewage",
            Self::Internet => "internet",
        }
    }

    /// Parses a utility type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "electricity" => Some(Self::Electricity),
            "water" => Some(Self::Water),
            "gas" => Some(Self::Gas),
            "sewage" => Some(Self::Sewage),
            "internet" => Some(Self::Internet),
            _ => None,
        }
    }
}

impl std::fmt::Display for UtilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One consumption tier of a rate plan.
///
/// Covers the half-open unit range `[from_units, to_units)`; `to_units` of
/// `None` means unlimited and is only valid on the last slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityRateSlab {
    /// Position of the slab within its plan; strictly increasing.
    pub slab_order: u16,
    /// Lower unit bound (inclusive).
    pub from_units: Decimal,
    /// Upper unit bound (exclusive); `None` = unlimited.
    pub to_units: Option<Decimal>,
    /// Price per unit within this slab.
    pub rate_per_unit: Decimal,
    /// Flat charge applied once if any units fall within this slab.
    pub fixed_charge: Option<Decimal>,
}

/// A named, ordered set of consumption slabs for one utility type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilityRatePlan {
    /// Unique identifier.
    pub id: RatePlanId,
    /// Organization owning the plan.
    pub organization_id: OrganizationId,
    /// Utility type this plan prices.
    pub utility_type: UtilityType,
    /// Human-readable plan name.
    pub name: String,
    /// Ordered slabs; validated before use.
    pub slabs: Vec<UtilityRateSlab>,
}

/// How a statement's charge is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum UtilityCharge {
    /// Meter readings; consumption is `current - previous`.
    MeterReading {
        /// Meter reading at period start.
        previous: Decimal,
        /// Meter reading at period end.
        current: Decimal,
    },
    /// Amount billed directly by the provider, passed through.
    ProviderAmount(Decimal),
}

/// One billing-period utility record for a lease.
///
/// Statements are versioned; at most one record per
/// (lease, period, utility type) may be final, and only final statements
/// are billed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilityStatement {
    /// Unique identifier.
    pub id: UtilityStatementId,
    /// Lease the consumption belongs to.
    pub lease_id: LeaseId,
    /// Utility type measured.
    pub utility_type: UtilityType,
    /// Period start (inclusive).
    pub period_start: NaiveDate,
    /// Period end (inclusive).
    pub period_end: NaiveDate,
    /// Charge basis (readings or provider amount).
    pub charge: UtilityCharge,
    /// Monotonically increasing revision for this statement key.
    pub version: i32,
    /// True for the single billable revision.
    pub is_final: bool,
}

impl UtilityStatement {
    /// Units consumed, if this statement is meter-based.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::MeterRegression` if the current reading is
    /// below the previous one.
    pub fn consumed_units(&self) -> Result<Option<Decimal>, StatementError> {
        match self.charge {
            UtilityCharge::MeterReading { previous, current } => {
                if current < previous {
                    return Err(StatementError::MeterRegression { previous, current });
                }
                Ok(Some(current - previous))
            }
            UtilityCharge::ProviderAmount(_) => Ok(None),
        }
    }

    /// True if the statement covers exactly the given period.
    #[must_use]
    pub fn matches_period(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.period_start == start && self.period_end == end
    }

    /// True if this statement shares a (lease, period, type) key with `other`.
    #[must_use]
    pub fn same_key(&self, other: &Self) -> bool {
        self.lease_id == other.lease_id
            && self.utility_type == other.utility_type
            && self.period_start == other.period_start
            && self.period_end == other.period_end
    }
}

/// Marks a statement revision final against the existing revisions for its
/// key, assigning the next version number.
///
/// # Errors
///
/// Returns `StatementError::DuplicateFinalStatement` if a final revision
/// already exists for the same (lease, period, utility type), or
/// `StatementError::MeterRegression` for inverted meter readings.
pub fn finalize_statement(
    existing: &[UtilityStatement],
    mut candidate: UtilityStatement,
) -> Result<UtilityStatement, StatementError> {
    // Surface bad readings before the statement can become billable.
    candidate.consumed_units()?;

    let peers: Vec<_> = existing.iter().filter(|s| s.same_key(&candidate)).collect();
    if peers.iter().any(|s| s.is_final) {
        return Err(StatementError::DuplicateFinalStatement);
    }

    candidate.version = peers.iter().map(|s| s.version).max().unwrap_or(0) + 1;
    candidate.is_final = true;
    Ok(candidate)
}
