//! Batch invoice run orchestration.
//!
//! One run attempts to generate invoices for every due lease of an
//! organization in a billing period. Leases are processed independently
//! with bounded concurrency; one lease's failure never aborts the batch.
//!
//! # Modules
//!
//! - `types` - Runs, run items, statuses, and the run summary
//! - `error` - Run-level and store error types
//! - `store` - The async persistence port the orchestrator drives
//! - `orchestrator` - The batch state machine itself

pub mod error;
pub mod orchestrator;
pub mod store;
pub mod types;


pub use error::{GenerateError, RunError, StoreError};
pub use orchestrator::InvoiceRunOrchestrator;
pub use store::BillingStore;
pub use types::{InvoiceRun, InvoiceRunItem, InvoiceRunStatus, InvoiceRunSummary};
