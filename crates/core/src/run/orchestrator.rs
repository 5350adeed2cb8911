//! The batch invoice run state machine.
//!
//! Pending → Running → {Completed, Failed, Cancelled}. A run never retries
//! on its own; a new attempt is a new run. Per-lease work is dispatched
//! onto bounded concurrent tasks and the outcomes are aggregated after the
//! join, never through shared mutable counters.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use rentora_shared::types::{InvoiceRunId, LeaseId, OrganizationId};
use rentora_shared::BillingConfig;

use super::error::{GenerateError, RunError};
use super::store::BillingStore;
use super::types::{InvoiceRun, InvoiceRunItem, InvoiceRunStatus, InvoiceRunSummary};
use crate::clock::Clock;
use crate::invoice::{assemble, format_invoice_number, BillingPeriod, ChargeType, Invoice};

/// Drives one batch invoice run for an organization and billing period.
pub struct InvoiceRunOrchestrator<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
    worker_count: usize,
    default_number_prefix: String,
}

impl<S, C> InvoiceRunOrchestrator<S, C>
where
    S: BillingStore + 'static,
    C: Clock + 'static,
{
    /// Creates an orchestrator over the given store and clock.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, config: &BillingConfig) -> Self {
        Self {
            store,
            clock,
            worker_count: config.run.worker_count.max(1),
            default_number_prefix: config.invoice.default_number_prefix.clone(),
        }
    }

    /// Executes a batch run.
    ///
    /// The run always finishes with a summary: per-lease failures are
    /// recorded on the run items and counted, never raised. The run ends
    /// Failed only on run-level faults (the lease selection or reference
    /// data load failing), and Cancelled when the signal fires mid-run;
    /// invoices already produced stay valid either way.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] only when the run record itself cannot be
    /// persisted.
    pub async fn run(
        &self,
        organization_id: OrganizationId,
        period: BillingPeriod,
        cancel: CancellationToken,
    ) -> Result<InvoiceRunSummary, RunError> {
        let mut run = InvoiceRun::pending(organization_id, period);
        self.store.insert_run(&run).await?;

        run.status = InvoiceRunStatus::Running;
        run.started_at = Some(self.clock.now_utc());
        self.store.update_run(&run).await?;
        info!(run_id = %run.id, organization_id = %organization_id, %period, "Invoice run started");

        let lease_ids = match self.store.select_due_leases(organization_id, period).await {
            Ok(ids) => ids,
            Err(e) => return self.fail_run(run, &e.to_string()).await,
        };
        let tax_rates = match self.store.load_tax_rates(organization_id).await {
            Ok(rates) => Arc::new(rates),
            Err(e) => return self.fail_run(run, &e.to_string()).await,
        };

        run.total_leases = u32::try_from(lease_ids.len()).unwrap_or(u32::MAX);
        let total = lease_ids.len();

        let semaphore = Arc::new(Semaphore::new(self.worker_count));
        let mut join_set = JoinSet::new();
        let mut dispatched = 0usize;

        for lease_id in lease_ids {
            if cancel.is_cancelled() {
                break;
            }
            // Wait for a worker slot, bailing out promptly on cancellation.
            let permit = tokio::select! {
                permit = Arc::clone(&semaphore).acquire_owned() => {
                    permit.expect("semaphore is never closed")
                }
                () = cancel.cancelled() => break,
            };
            if cancel.is_cancelled() {
                break;
            }

            let store = Arc::clone(&self.store);
            let clock = Arc::clone(&self.clock);
            let tax_rates = Arc::clone(&tax_rates);
            let run_id = run.id;
            let default_prefix = self.default_number_prefix.clone();
            dispatched += 1;

            join_set.spawn(async move {
                let _permit = permit;
                process_lease(
                    store.as_ref(),
                    clock.as_ref(),
                    &tax_rates,
                    run_id,
                    lease_id,
                    period,
                    &default_prefix,
                )
                .await
            });
        }

        let cancelled = dispatched < total;

        // Aggregate after the join; per-lease outcomes stay isolated.
        let mut success_count = 0u32;
        let mut failure_count = 0u32;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(item) => {
                    if item.succeeded {
                        success_count += 1;
                    } else {
                        failure_count += 1;
                    }
                }
                Err(join_error) => {
                    warn!(run_id = %run.id, error = %join_error, "Invoice worker task failed");
                    failure_count += 1;
                }
            }
        }

        run.success_count = success_count;
        run.failure_count = failure_count;
        run.status = if cancelled {
            InvoiceRunStatus::Cancelled
        } else {
            InvoiceRunStatus::Completed
        };
        run.completed_at = Some(self.clock.now_utc());
        self.store.update_run(&run).await?;

        info!(
            run_id = %run.id,
            status = %run.status,
            total = run.total_leases,
            succeeded = run.success_count,
            failed = run.failure_count,
            "Invoice run finished"
        );
        Ok(run.summary())
    }

    /// Generates one invoice for one lease, outside any batch.
    ///
    /// This is the synchronous, request-driven path: failures come back as
    /// typed errors instead of being recorded on run items, and the
    /// duplicate-period constraint still applies.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Assembly`] for component failures and
    /// [`GenerateError::Store`] for persistence failures, including the
    /// duplicate-invoice conflict.
    pub async fn generate_invoice_for_lease(
        &self,
        lease_id: LeaseId,
        period: BillingPeriod,
    ) -> Result<Invoice, GenerateError> {
        generate_one(
            self.store.as_ref(),
            self.clock.as_ref(),
            None,
            lease_id,
            period,
            &self.default_number_prefix,
        )
        .await
    }

    /// Marks the run Failed after a run-level fault and returns its summary.
    async fn fail_run(
        &self,
        mut run: InvoiceRun,
        reason: &str,
    ) -> Result<InvoiceRunSummary, RunError> {
        warn!(run_id = %run.id, reason, "Invoice run failed");
        run.status = InvoiceRunStatus::Failed;
        run.error_message = Some(reason.to_string());
        run.completed_at = Some(self.clock.now_utc());
        self.store.update_run(&run).await?;
        Ok(run.summary())
    }
}

/// Processes one lease end to end and records its run item.
///
/// Failures are captured into the item; nothing escapes to the caller, so
/// one lease can never abort the batch.
async fn process_lease<S: BillingStore, C: Clock>(
    store: &S,
    clock: &C,
    tax_rates: &HashMap<ChargeType, Decimal>,
    run_id: InvoiceRunId,
    lease_id: LeaseId,
    period: BillingPeriod,
    default_prefix: &str,
) -> InvoiceRunItem {
    let outcome = generate_one(store, clock, Some(tax_rates), lease_id, period, default_prefix)
        .await;

    let item = match outcome {
        Ok(invoice) => InvoiceRunItem {
            run_id,
            lease_id,
            succeeded: true,
            invoice_id: Some(invoice.id),
            error: None,
            processed_at: clock.now_utc(),
        },
        Err(error) => {
            let reason = error.to_string();
            warn!(%lease_id, %reason, "Invoice generation failed for lease");
            InvoiceRunItem {
                run_id,
                lease_id,
                succeeded: false,
                invoice_id: None,
                error: Some(reason),
                processed_at: clock.now_utc(),
            }
        }
    };

    if let Err(e) = store.insert_run_item(&item).await {
        warn!(%lease_id, error = %e, "Failed to record run item");
        let mut failed = item;
        failed.succeeded = false;
        failed.invoice_id = None;
        failed.error = Some(format!("Failed to record run item: {e}"));
        return failed;
    }
    item
}

/// Assembles and persists one invoice.
///
/// `tax_rates` may be preloaded by a batch run; a single-lease call passes
/// `None` and the rates are loaded for the lease's organization.
async fn generate_one<S: BillingStore, C: Clock>(
    store: &S,
    clock: &C,
    tax_rates: Option<&HashMap<ChargeType, Decimal>>,
    lease_id: LeaseId,
    period: BillingPeriod,
    default_prefix: &str,
) -> Result<Invoice, GenerateError> {
    let ctx = store.load_assembly_context(lease_id, period).await?;

    let loaded;
    let tax_rates = match tax_rates {
        Some(rates) => rates,
        None => {
            loaded = store.load_tax_rates(ctx.lease.organization_id).await?;
            &loaded
        }
    };

    let sequence = store
        .next_invoice_sequence(ctx.lease.organization_id)
        .await?;
    let prefix = ctx
        .billing
        .invoice_number_prefix
        .as_deref()
        .unwrap_or(default_prefix);
    let number = format_invoice_number(prefix, period.start, sequence);

    let invoice = assemble(
        &ctx,
        period,
        number,
        |charge_type| tax_rates.get(&charge_type).copied(),
        clock,
    )?;

    store.insert_invoice(&invoice).await?;
    Ok(invoice)
}
