//! The Draft → Active activation gate.
//!
//! This is the only place a lease's status may become Active. The caller
//! loads the lease with its parties and terms, answers the unit-occupancy
//! question, and persists the returned lease under compare-and-swap so two
//! concurrent activations cannot both claim the same unit.

use rentora_shared::types::ConcurrencyToken;

use super::error::ActivationError;
use super::types::{Lease, LeaseParty, LeaseStatus, PartyRole};
use crate::term::TermHistory;

/// Upper bound for `rent_due_day`, chosen so the day exists in every month,
/// February included.
pub const MAX_RENT_DUE_DAY: u8 = 28;

/// Stateless validation gate for lease activation.
pub struct ActivationValidator;

impl ActivationValidator {
    /// Validates and executes the Draft → Active transition.
    ///
    /// Checks run in a fixed order and the first failure aborts the
    /// transition:
    /// 1. the expected concurrency token matches
    /// 2. the lease is in Draft status
    /// 3. the unit has no other active lease on the start date
    /// 4. at least one party holds the Primary Tenant role
    /// 5. at least one party is payment-responsible
    /// 6. a term's effective interval contains the start date
    /// 7. the rent due day lies in [1, 28]
    /// 8. the end date, if set, is strictly after the start date
    ///
    /// On success the returned lease carries `status = Active` and a bumped
    /// version; the input is untouched.
    ///
    /// # Arguments
    /// * `lease` - The lease to activate, fully loaded
    /// * `parties` - The lease's party set
    /// * `terms` - The lease's term history
    /// * `expected_version` - The concurrency token the caller read
    /// * `unit_occupied` - Answers "does the unit have another active lease
    ///   overlapping the start date?"
    ///
    /// # Errors
    ///
    /// Returns the first failing check as an [`ActivationError`].
    pub fn activate<F>(
        lease: &Lease,
        parties: &[LeaseParty],
        terms: &TermHistory,
        expected_version: ConcurrencyToken,
        unit_occupied: F,
    ) -> Result<Lease, ActivationError>
    where
        F: FnOnce() -> bool,
    {
        if lease.version != expected_version {
            return Err(ActivationError::ConcurrencyConflict {
                expected: expected_version,
                actual: lease.version,
            });
        }

        if lease.status != LeaseStatus::Draft {
            return Err(ActivationError::InvalidLeaseState {
                current: lease.status,
            });
        }

        if unit_occupied() {
            return Err(ActivationError::UnitAlreadyOccupied {
                unit_id: lease.unit_id,
            });
        }

        if !parties.iter().any(|p| p.role == PartyRole::PrimaryTenant) {
            return Err(ActivationError::MissingPrimaryTenant);
        }

        if !parties.iter().any(|p| p.is_payment_responsible) {
            return Err(ActivationError::NoPayerDesignated);
        }

        if terms.resolve(lease.id, lease.start_date).is_err() {
            return Err(ActivationError::NoTermForStartDate {
                start_date: lease.start_date,
            });
        }

        if lease.rent_due_day == 0 || lease.rent_due_day > MAX_RENT_DUE_DAY {
            return Err(ActivationError::InvalidRentDueDay {
                day: lease.rent_due_day,
            });
        }

        if let Some(end) = lease.end_date
            && end <= lease.start_date
        {
            return Err(ActivationError::InvalidDateRange {
                start: lease.start_date,
                end,
            });
        }

        let mut activated = lease.clone();
        activated.status = LeaseStatus::Active;
        activated.version = lease.version.next();
        Ok(activated)
    }
}
