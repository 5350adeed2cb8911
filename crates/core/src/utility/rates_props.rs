//! Property-based tests for the utility rate engine.

use proptest::prelude::*;
use rentora_shared::types::{OrganizationId, RatePlanId};
use rust_decimal::Decimal;

use super::rates::ValidatedRatePlan;
use super::types::{UtilityRatePlan, UtilityRateSlab, UtilityType};

/// Strategy for a contiguous plan of 1-4 bounded slabs plus an unbounded
/// tail, with non-negative rates and fixed charges.
fn valid_plan() -> impl Strategy<Value = UtilityRatePlan> {
    (
        prop::collection::vec((1u32..500, 0u32..1000, prop::option::of(0u32..5000)), 1..5),
        0u32..1000,
    )
        .prop_map(|(bounded, tail_rate)| {
            let mut slabs = Vec::new();
            let mut from = Decimal::ZERO;
            for (index, (width, rate, fixed)) in bounded.iter().enumerate() {
                let to = from + Decimal::from(*width);
                slabs.push(UtilityRateSlab {
                    slab_order: u16::try_from(index).unwrap() + 1,
                    from_units: from,
                    to_units: Some(to),
                    rate_per_unit: Decimal::new(i64::from(*rate), 2),
                    fixed_charge: fixed.map(|f| Decimal::new(i64::from(f), 2)),
                });
                from = to;
            }
            slabs.push(UtilityRateSlab {
                slab_order: u16::try_from(bounded.len()).unwrap() + 1,
                from_units: from,
                to_units: None,
                rate_per_unit: Decimal::new(i64::from(tail_rate), 2),
                fixed_charge: None,
            });
            UtilityRatePlan {
                id: RatePlanId::new(),
                organization_id: OrganizationId::new(),
                utility_type: UtilityType::Water,
                name: "Generated".to_string(),
                slabs,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Utility rate monotonicity: *for any* valid plan with non-negative
    /// rates, increasing consumption never decreases the charge.
    #[test]
    fn prop_charge_is_monotonic_in_consumption(
        plan in valid_plan(),
        consumed in 0u32..10_000,
        extra in 0u32..500,
    ) {
        let validated = ValidatedRatePlan::try_from_plan(plan).expect("generated plan is valid");
        let lower = validated.charge_for(Decimal::from(consumed)).unwrap();
        let higher = validated.charge_for(Decimal::from(consumed + extra)).unwrap();
        prop_assert!(higher >= lower, "charge decreased: {lower} -> {higher}");
    }

    /// *For any* valid plan, zero consumption is always free.
    #[test]
    fn prop_zero_consumption_is_free(plan in valid_plan()) {
        let validated = ValidatedRatePlan::try_from_plan(plan).expect("generated plan is valid");
        prop_assert_eq!(validated.charge_for(Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    /// Generated plans always pass load-time validation; shuffling the
    /// first slab's start off zero always fails it.
    #[test]
    fn prop_offset_first_slab_is_rejected(plan in valid_plan(), offset in 1u32..100) {
        let mut broken = plan;
        broken.slabs[0].from_units = Decimal::from(offset);
        prop_assert!(ValidatedRatePlan::try_from_plan(broken).is_err());
    }
}
