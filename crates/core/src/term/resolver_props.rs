//! Property-based tests for term resolution and escalation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rentora_shared::types::{LeaseId, LeaseTermId};
use rust_decimal::Decimal;

use super::resolver::escalated_rent;
use super::types::{Escalation, LeaseTerm, TermHistory};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn make_term(from: NaiveDate, to: Option<NaiveDate>, escalation: Escalation) -> LeaseTerm {
    LeaseTerm {
        id: LeaseTermId::new(),
        lease_id: LeaseId::new(),
        effective_from: from,
        effective_to: to,
        monthly_rent: Decimal::new(100_000, 2),
        security_deposit: Decimal::ZERO,
        maintenance_charge: None,
        other_fixed_charge: None,
        escalation,
    }
}

/// Strategy for a rent amount between 0.01 and 100,000.00.
fn rent_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* date inside a contiguous history, resolution returns the
    /// term whose interval contains the date, independent of append order.
    #[test]
    fn prop_resolution_is_by_containment(offset in 0u32..720) {
        let lease_id = LeaseId::new();
        let boundary = base_date() + chrono::Duration::days(365);
        let mut history = TermHistory::new();
        // Later term appended first.
        history
            .append(make_term(boundary, None, Escalation::None))
            .unwrap();
        history
            .append(make_term(base_date(), Some(boundary), Escalation::None))
            .unwrap();

        let date = base_date() + chrono::Duration::days(i64::from(offset));
        let resolved = history.resolve(lease_id, date).unwrap();
        prop_assert!(resolved.contains_date(date));
        prop_assert_eq!(resolved.effective_from, if date < boundary { base_date() } else { boundary });
    }

    /// *For any* non-negative percentage, escalated rent never decreases
    /// as more intervals elapse.
    #[test]
    fn prop_percentage_escalation_is_monotonic(
        rent in rent_amount(),
        percent in 0i64..50,
        intervals in 0u32..10,
    ) {
        let mut term = make_term(base_date(), None, Escalation::Percentage {
            percent: Decimal::from(percent),
            interval_months: 12,
        });
        term.monthly_rent = rent;

        let now = escalated_rent(&term, intervals);
        let later = escalated_rent(&term, intervals + 1);
        prop_assert!(later >= now, "escalation decreased rent: {now} -> {later}");
    }

    /// *For any* fixed increment, escalation is linear in elapsed intervals.
    #[test]
    fn prop_fixed_increment_is_linear(
        rent in rent_amount(),
        step_cents in 0i64..1_000_00,
        intervals in 0u32..24,
    ) {
        let step = Decimal::new(step_cents, 2);
        let mut term = make_term(base_date(), None, Escalation::FixedIncrement {
            amount: step,
            interval_months: 1,
        });
        term.monthly_rent = rent;

        let expected = rent + step * Decimal::from(intervals);
        prop_assert_eq!(escalated_rent(&term, intervals), expected);
    }

    /// Appending any term that starts inside an open-ended term is rejected.
    #[test]
    fn prop_overlap_always_rejected(offset in 0u32..3650) {
        let mut history = TermHistory::new();
        history
            .append(make_term(base_date(), None, Escalation::None))
            .unwrap();

        let from = base_date() + chrono::Duration::days(i64::from(offset));
        let result = history.append(make_term(from, None, Escalation::None));
        prop_assert!(result.is_err());
    }
}
