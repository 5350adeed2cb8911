//! Invoice run domain types.

use chrono::{DateTime, Utc};
use rentora_shared::types::{InvoiceId, InvoiceRunId, LeaseId, OrganizationId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::invoice::BillingPeriod;

/// Status of a batch invoice run.
///
/// The valid transitions are:
/// - Pending → Running (start)
/// - Running → Completed (all leases iterated, regardless of per-lease outcomes)
/// - Running → Failed (run-level fault, e.g. the lease selection itself failed)
/// - Running → Cancelled (cancellation signal observed mid-run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceRunStatus {
    /// Created, not yet started.
    Pending,
    /// Processing leases.
    Running,
    /// Finished iterating; per-lease failures are recorded on the items.
    Completed,
    /// Aborted by a run-level infrastructure fault.
    Failed,
    /// Stopped early by the cancellation signal; completed items stand.
    Cancelled,
}

impl InvoiceRunStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the run reached a final state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for InvoiceRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One batch execution for an organization and billing period.
///
/// Runs are created, run to completion, and never mutated afterward;
/// corrections append a new run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRun {
    /// Unique identifier.
    pub id: InvoiceRunId,
    /// Organization billed.
    pub organization_id: OrganizationId,
    /// Period billed.
    pub period: BillingPeriod,
    /// Current status.
    pub status: InvoiceRunStatus,
    /// Leases selected for this run.
    pub total_leases: u32,
    /// Leases whose invoice was produced.
    pub success_count: u32,
    /// Leases whose assembly or persistence failed.
    pub failure_count: u32,
    /// Run-level fault description, set only when status is Failed.
    pub error_message: Option<String>,
    /// When processing started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the run reached a terminal status.
    pub completed_at: Option<DateTime<Utc>>,
}

impl InvoiceRun {
    /// Creates a pending run.
    #[must_use]
    pub fn pending(organization_id: OrganizationId, period: BillingPeriod) -> Self {
        Self {
            id: InvoiceRunId::new(),
            organization_id,
            period,
            status: InvoiceRunStatus::Pending,
            total_leases: 0,
            success_count: 0,
            failure_count: 0,
            error_message: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Condenses the run into its caller-facing summary.
    #[must_use]
    pub fn summary(&self) -> InvoiceRunSummary {
        InvoiceRunSummary {
            run_id: self.id,
            status: self.status,
            total_leases: self.total_leases,
            success_count: self.success_count,
            failure_count: self.failure_count,
        }
    }
}

/// One attempted lease within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRunItem {
    /// The run this item belongs to.
    pub run_id: InvoiceRunId,
    /// The lease attempted.
    pub lease_id: LeaseId,
    /// True if an invoice was produced and persisted.
    pub succeeded: bool,
    /// The produced invoice, absent on failure.
    pub invoice_id: Option<InvoiceId>,
    /// The failure reason, absent on success.
    pub error: Option<String>,
    /// When the lease was processed.
    pub processed_at: DateTime<Utc>,
}

/// Caller-facing result of a batch run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InvoiceRunSummary {
    /// The run.
    pub run_id: InvoiceRunId,
    /// Terminal status of the run.
    pub status: InvoiceRunStatus,
    /// Leases selected.
    pub total_leases: u32,
    /// Invoices produced.
    pub success_count: u32,
    /// Per-lease failures recorded.
    pub failure_count: u32,
}
