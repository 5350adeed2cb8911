//! The persistence port the orchestrator drives.
//!
//! The core never talks to a database; the host supplies an implementation
//! backed by its transactional unit-of-work. Every method is an async I/O
//! boundary.

use std::collections::HashMap;

use async_trait::async_trait;
use rentora_shared::types::{LeaseId, OrganizationId};
use rust_decimal::Decimal;

use super::error::StoreError;
use super::types::{InvoiceRun, InvoiceRunItem};
use crate::invoice::{AssemblyContext, BillingPeriod, ChargeType, Invoice};

/// Repository-style access to everything a batch run reads and writes.
#[async_trait]
pub trait BillingStore: Send + Sync {
    /// Selects the leases due for billing in the period: Active leases
    /// with automatic generation enabled whose billing day falls within
    /// the period and which do not already have a non-void invoice for
    /// that exact period (the idempotency guard).
    async fn select_due_leases(
        &self,
        organization_id: OrganizationId,
        period: BillingPeriod,
    ) -> Result<Vec<LeaseId>, StoreError>;

    /// Loads everything invoice assembly needs for one lease.
    async fn load_assembly_context(
        &self,
        lease_id: LeaseId,
        period: BillingPeriod,
    ) -> Result<AssemblyContext, StoreError>;

    /// Charge-type tax rates for the organization (external reference
    /// data; absent entries mean untaxed).
    async fn load_tax_rates(
        &self,
        organization_id: OrganizationId,
    ) -> Result<HashMap<ChargeType, Decimal>, StoreError>;

    /// Issues the next organization-scoped invoice sequence number.
    async fn next_invoice_sequence(
        &self,
        organization_id: OrganizationId,
    ) -> Result<u64, StoreError>;

    /// Persists an invoice atomically.
    ///
    /// Implementations must enforce at most one non-void invoice per
    /// (lease, period) and reject the loser of a concurrent write with
    /// [`StoreError::DuplicateInvoice`].
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), StoreError>;

    /// Persists a new run record.
    async fn insert_run(&self, run: &InvoiceRun) -> Result<(), StoreError>;

    /// Updates a run record as it progresses through its lifecycle.
    async fn update_run(&self, run: &InvoiceRun) -> Result<(), StoreError>;

    /// Appends one per-lease outcome record.
    async fn insert_run_item(&self, item: &InvoiceRunItem) -> Result<(), StoreError>;
}
