//! Property-based tests for proration.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::{days_in_month, prorate, ProrationMethod};

/// Strategy for a monthly charge between 0.01 and 1,000,000.00.
fn charge_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a month start in 2025-2027.
fn month_start() -> impl Strategy<Value = NaiveDate> {
    (2025i32..2028, 1u32..13)
        .prop_map(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1).expect("valid month"))
}

fn method_strategy() -> impl Strategy<Value = ProrationMethod> {
    prop_oneof![
        Just(ProrationMethod::ActualDaysInMonth),
        Just(ProrationMethod::ThirtyDayMonth),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Proration idempotence: *for any* amount, month, and policy,
    /// prorating the full calendar month returns the amount exactly.
    #[test]
    fn prop_full_month_is_identity(
        amount in charge_amount(),
        start in month_start(),
        method in method_strategy(),
    ) {
        let end = start + chrono::Duration::days(days_in_month(start));
        let result = prorate(amount, start, end, method).unwrap();
        prop_assert_eq!(result, amount);
    }

    /// *For any* partial range, the prorated amount never exceeds the
    /// full charge under the actual-days policy.
    #[test]
    fn prop_partial_never_exceeds_full_actual_days(
        amount in charge_amount(),
        start in month_start(),
        span in 0i64..28,
    ) {
        let from = start;
        let to = start + chrono::Duration::days(span);
        let result = prorate(amount, from, to, ProrationMethod::ActualDaysInMonth).unwrap();
        prop_assert!(result <= amount);
        prop_assert!(result >= Decimal::ZERO);
    }

    /// *For any* range, adding a day never decreases the prorated amount.
    #[test]
    fn prop_proration_is_monotonic_in_days(
        amount in charge_amount(),
        start in month_start(),
        span in 0i64..27,
        method in method_strategy(),
    ) {
        let shorter = prorate(amount, start, start + chrono::Duration::days(span), method).unwrap();
        let longer = prorate(amount, start, start + chrono::Duration::days(span + 1), method).unwrap();
        prop_assert!(longer >= shorter);
    }
}
