//! Lease lifecycle management.
//!
//! A lease moves through a closed state machine:
//! Draft → Active → NoticeGiven → Ended, with Draft → Cancelled as the
//! terminal alternative before activation. Activation is the only gate
//! through which a lease becomes billable.
//!
//! # Modules
//!
//! - `types` - Lease, parties, billing settings, and status enums
//! - `error` - Activation and transition error types
//! - `activation` - The Draft → Active validation gate
//! - `lifecycle` - The remaining state transitions, one function per edge

pub mod activation;
pub mod error;
pub mod lifecycle;
pub mod types;

#[cfg(test)]
mod activation_props;

pub use activation::ActivationValidator;
pub use error::{ActivationError, TransitionError};
pub use lifecycle::LeaseLifecycle;
pub use types::{
    LateFeePolicy, Lease, LeaseBillingSetting, LeaseParty, LeaseStatus, PartyRole,
};
