//! Property-based tests for the activation gate.

use chrono::NaiveDate;
use proptest::prelude::*;
use rentora_shared::types::{
    ConcurrencyToken, Currency, LeaseId, LeaseTermId, OrganizationId, TenantId, UnitId,
};
use rust_decimal::Decimal;

use super::activation::ActivationValidator;
use super::error::ActivationError;
use super::types::{LateFeePolicy, Lease, LeaseParty, LeaseStatus, PartyRole};
use crate::term::{Escalation, LeaseTerm, TermHistory};

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
}

fn draft_lease(rent_due_day: u8) -> Lease {
    Lease {
        id: LeaseId::new(),
        organization_id: OrganizationId::new(),
        unit_id: UnitId::new(),
        status: LeaseStatus::Draft,
        start_date: start_date(),
        end_date: None,
        rent_due_day,
        grace_days: 3,
        late_fee_policy: LateFeePolicy::None,
        auto_renew: false,
        currency: Currency::Usd,
        version: ConcurrencyToken::initial(),
    }
}

fn valid_parties(lease_id: LeaseId) -> Vec<LeaseParty> {
    vec![LeaseParty {
        lease_id,
        tenant_id: TenantId::new(),
        role: PartyRole::PrimaryTenant,
        is_payment_responsible: true,
    }]
}

fn covering_terms(lease: &Lease) -> TermHistory {
    TermHistory::from_terms(vec![LeaseTerm {
        id: LeaseTermId::new(),
        lease_id: lease.id,
        effective_from: lease.start_date,
        effective_to: None,
        monthly_rent: Decimal::new(150_000, 2),
        security_deposit: Decimal::ZERO,
        maintenance_charge: None,
        other_fixed_charge: None,
        escalation: Escalation::None,
    }])
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* rent due day in [1, 28], activation's date-based checks
    /// pass (other invariants permitting).
    #[test]
    fn prop_rent_due_day_in_range_activates(day in 1u8..=28) {
        let lease = draft_lease(day);
        let parties = valid_parties(lease.id);
        let terms = covering_terms(&lease);

        let result =
            ActivationValidator::activate(&lease, &parties, &terms, lease.version, || false);
        prop_assert!(result.is_ok());
        prop_assert_eq!(result.unwrap().status, LeaseStatus::Active);
    }

    /// *For any* rent due day outside [1, 28], activation fails with
    /// `InvalidRentDueDay`.
    #[test]
    fn prop_rent_due_day_out_of_range_rejected(day in 29u8..=255) {
        let lease = draft_lease(day);
        let parties = valid_parties(lease.id);
        let terms = covering_terms(&lease);

        let result =
            ActivationValidator::activate(&lease, &parties, &terms, lease.version, || false);
        let matched = matches!(result, Err(ActivationError::InvalidRentDueDay { .. }));
        prop_assert!(matched);
    }

    /// *For any* otherwise valid lease, an occupied unit always rejects
    /// activation with `UnitAlreadyOccupied`.
    #[test]
    fn prop_occupied_unit_always_rejected(day in 1u8..=28) {
        let lease = draft_lease(day);
        let parties = valid_parties(lease.id);
        let terms = covering_terms(&lease);

        let result =
            ActivationValidator::activate(&lease, &parties, &terms, lease.version, || true);
        let matched = matches!(result, Err(ActivationError::UnitAlreadyOccupied { .. }));
        prop_assert!(matched);
    }

    /// *For any* non-Draft source status, activation fails with
    /// `InvalidLeaseState` before any other check runs.
    #[test]
    fn prop_non_draft_status_rejected(
        status in prop_oneof![
            Just(LeaseStatus::Active),
            Just(LeaseStatus::NoticeGiven),
            Just(LeaseStatus::Ended),
            Just(LeaseStatus::Cancelled),
        ],
    ) {
        let mut lease = draft_lease(5);
        lease.status = status;
        let parties = valid_parties(lease.id);
        let terms = covering_terms(&lease);

        let result =
            ActivationValidator::activate(&lease, &parties, &terms, lease.version, || false);
        let matched = matches!(result, Err(ActivationError::InvalidLeaseState { .. }));
        prop_assert!(matched);
    }
}
