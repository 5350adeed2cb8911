//! Rate plan validation and the tiered charge computation.
//!
//! Validation happens once, at plan load; billing only ever sees a
//! [`ValidatedRatePlan`]. Consumption exactly on a slab boundary belongs to
//! the lower slab (half-open `[from, to)` intervals).

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::RatePlanError;
use super::types::{UtilityRatePlan, UtilityRateSlab};

/// A rate plan whose slab structure has been checked.
///
/// Construction is the only path to a usable plan, so billing can assume
/// sorted, contiguous, non-overlapping slabs with non-negative rates.
#[derive(Debug, Clone)]
pub struct ValidatedRatePlan {
    plan: UtilityRatePlan,
}

impl ValidatedRatePlan {
    /// Validates a plan's slab structure.
    ///
    /// Rules, checked in order per slab:
    /// - the plan has at least one slab
    /// - `slab_order` is strictly increasing
    /// - the first slab starts at zero; every later slab starts exactly
    ///   where the previous one ended
    /// - bounded slabs have `to_units > from_units`
    /// - at most one slab is unbounded, and it must be last
    /// - rates and fixed charges are non-negative
    ///
    /// # Errors
    ///
    /// Returns the first `RatePlanError` violation found.
    pub fn try_from_plan(plan: UtilityRatePlan) -> Result<Self, RatePlanError> {
        if plan.slabs.is_empty() {
            return Err(RatePlanError::EmptyPlan);
        }

        let mut expected_from = Decimal::ZERO;
        let mut previous_order: Option<u16> = None;
        let last_index = plan.slabs.len() - 1;

        for (index, slab) in plan.slabs.iter().enumerate() {
            if let Some(prev) = previous_order
                && slab.slab_order <= prev
            {
                return Err(RatePlanError::UnsortedSlabs {
                    order: slab.slab_order,
                });
            }
            previous_order = Some(slab.slab_order);

            if slab.from_units != expected_from {
                return Err(RatePlanError::NonContiguousSlabs {
                    expected_from,
                    actual_from: slab.from_units,
                });
            }

            match slab.to_units {
                Some(to) => {
                    if to <= slab.from_units {
                        return Err(RatePlanError::EmptySlabRange {
                            from: slab.from_units,
                            to,
                        });
                    }
                    expected_from = to;
                }
                None => {
                    if index != last_index {
                        // Distinguish "two unbounded" from "unbounded in the middle".
                        if plan.slabs[index + 1..].iter().any(|s| s.to_units.is_none()) {
                            return Err(RatePlanError::MultipleUnboundedSlabs);
                        }
                        return Err(RatePlanError::UnboundedSlabNotLast);
                    }
                }
            }

            if slab.rate_per_unit < Decimal::ZERO {
                return Err(RatePlanError::NegativeRate {
                    rate: slab.rate_per_unit,
                });
            }
            if let Some(charge) = slab.fixed_charge
                && charge < Decimal::ZERO
            {
                return Err(RatePlanError::NegativeFixedCharge { charge });
            }
        }

        Ok(Self { plan })
    }

    /// Total charge for the given consumption.
    ///
    /// Sums, over each slab, the units falling in that slab times its rate,
    /// plus the slab's fixed charge when any units fall within it. Rounded
    /// to 2 decimal places with banker's rounding.
    ///
    /// # Errors
    ///
    /// Returns `RatePlanError::NegativeConsumption` for negative input.
    pub fn charge_for(&self, consumed: Decimal) -> Result<Decimal, RatePlanError> {
        if consumed < Decimal::ZERO {
            return Err(RatePlanError::NegativeConsumption(consumed));
        }

        let mut total = Decimal::ZERO;
        for slab in &self.plan.slabs {
            let units = Self::units_in_slab(slab, consumed);
            if units > Decimal::ZERO {
                total += units * slab.rate_per_unit;
                if let Some(fixed) = slab.fixed_charge {
                    total += fixed;
                }
            }
        }

        Ok(total.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
    }

    /// Returns the underlying plan.
    #[must_use]
    pub fn plan(&self) -> &UtilityRatePlan {
        &self.plan
    }

    fn units_in_slab(slab: &UtilityRateSlab, consumed: Decimal) -> Decimal {
        let above_lower = (consumed - slab.from_units).max(Decimal::ZERO);
        match slab.to_units {
            Some(to) => above_lower.min(to - slab.from_units),
            None => above_lower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utility::types::UtilityType;
    use rentora_shared::types::{OrganizationId, RatePlanId};
    use rust_decimal_macros::dec;

    fn slab(
        order: u16,
        from: Decimal,
        to: Option<Decimal>,
        rate: Decimal,
        fixed: Option<Decimal>,
    ) -> UtilityRateSlab {
        UtilityRateSlab {
            slab_order: order,
            from_units: from,
            to_units: to,
            rate_per_unit: rate,
            fixed_charge: fixed,
        }
    }

    fn plan(slabs: Vec<UtilityRateSlab>) -> UtilityRatePlan {
        UtilityRatePlan {
            id: RatePlanId::new(),
            organization_id: OrganizationId::new(),
            utility_type: UtilityType::Electricity,
            name: "Residential".to_string(),
            slabs,
        }
    }

    fn two_tier_plan() -> ValidatedRatePlan {
        ValidatedRatePlan::try_from_plan(plan(vec![
            slab(1, dec!(0), Some(dec!(100)), dec!(0.10), None),
            slab(2, dec!(100), None, dec!(0.15), None),
        ]))
        .unwrap()
    }

    #[test]
    fn test_two_tier_charge() {
        // 100 x 0.10 + 50 x 0.15 = 17.50
        let charged = two_tier_plan().charge_for(dec!(150)).unwrap();
        assert_eq!(charged, dec!(17.50));
    }

    #[test]
    fn test_boundary_belongs_to_lower_slab() {
        // Exactly 100 units: all in the first slab, none in the second.
        let charged = two_tier_plan().charge_for(dec!(100)).unwrap();
        assert_eq!(charged, dec!(10.00));
    }

    #[test]
    fn test_zero_consumption_charges_nothing() {
        let charged = two_tier_plan().charge_for(dec!(0)).unwrap();
        assert_eq!(charged, Decimal::ZERO);
    }

    #[test]
    fn test_fixed_charge_applies_only_when_slab_reached() {
        let validated = ValidatedRatePlan::try_from_plan(plan(vec![
            slab(1, dec!(0), Some(dec!(50)), dec!(0.20), Some(dec!(5))),
            slab(2, dec!(50), None, dec!(0.30), Some(dec!(10))),
        ]))
        .unwrap();

        // 30 units: only the first slab is touched.
        assert_eq!(validated.charge_for(dec!(30)).unwrap(), dec!(11.00));
        // 60 units: both slabs and both fixed charges.
        // 50*0.20 + 5 + 10*0.30 + 10 = 28.00
        assert_eq!(validated.charge_for(dec!(60)).unwrap(), dec!(28.00));
    }

    #[test]
    fn test_negative_consumption_rejected() {
        let result = two_tier_plan().charge_for(dec!(-1));
        assert!(matches!(
            result,
            Err(RatePlanError::NegativeConsumption(_))
        ));
    }

    #[test]
    fn test_empty_plan_rejected() {
        let result = ValidatedRatePlan::try_from_plan(plan(vec![]));
        assert!(matches!(result, Err(RatePlanError::EmptyPlan)));
    }

    #[test]
    fn test_unsorted_orders_rejected() {
        let result = ValidatedRatePlan::try_from_plan(plan(vec![
            slab(2, dec!(0), Some(dec!(100)), dec!(0.10), None),
            slab(1, dec!(100), None, dec!(0.15), None),
        ]));
        assert!(matches!(result, Err(RatePlanError::UnsortedSlabs { .. })));
    }

    #[test]
    fn test_gap_between_slabs_rejected() {
        let result = ValidatedRatePlan::try_from_plan(plan(vec![
            slab(1, dec!(0), Some(dec!(100)), dec!(0.10), None),
            slab(2, dec!(120), None, dec!(0.15), None),
        ]));
        assert!(matches!(
            result,
            Err(RatePlanError::NonContiguousSlabs { .. })
        ));
    }

    #[test]
    fn test_first_slab_must_start_at_zero() {
        let result = ValidatedRatePlan::try_from_plan(plan(vec![slab(
            1,
            dec!(10),
            None,
            dec!(0.10),
            None,
        )]));
        assert!(matches!(
            result,
            Err(RatePlanError::NonContiguousSlabs { .. })
        ));
    }

    #[test]
    fn test_unbounded_slab_must_be_last() {
        let result = ValidatedRatePlan::try_from_plan(plan(vec![
            slab(1, dec!(0), None, dec!(0.10), None),
            slab(2, dec!(100), Some(dec!(200)), dec!(0.15), None),
        ]));
        assert!(matches!(
            result,
            Err(RatePlanError::UnboundedSlabNotLast)
        ));
    }

    #[test]
    fn test_multiple_unbounded_slabs_rejected() {
        let result = ValidatedRatePlan::try_from_plan(plan(vec![
            slab(1, dec!(0), None, dec!(0.10), None),
            slab(2, dec!(100), None, dec!(0.15), None),
        ]));
        assert!(matches!(
            result,
            Err(RatePlanError::MultipleUnboundedSlabs)
        ));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = ValidatedRatePlan::try_from_plan(plan(vec![slab(
            1,
            dec!(0),
            None,
            dec!(-0.10),
            None,
        )]));
        assert!(matches!(result, Err(RatePlanError::NegativeRate { .. })));
    }

    #[test]
    fn test_inverted_slab_range_rejected() {
        let result = ValidatedRatePlan::try_from_plan(plan(vec![slab(
            1,
            dec!(0),
            Some(dec!(0)),
            dec!(0.10),
            None,
        )]));
        assert!(matches!(result, Err(RatePlanError::EmptySlabRange { .. })));
    }
}
