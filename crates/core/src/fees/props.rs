//! Property-based tests for the fee schedule.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::FeeCalculator;
use super::schedule;

/// Strategy to generate positive naira amounts (0.01 to 10,000,000.00).
fn naira_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|kobo| Decimal::new(kobo, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The conversion fee never exceeds its 100 naira cap.
    #[test]
    fn prop_conversion_fee_capped(amount in naira_amount()) {
        let fee = schedule::conversion_fee_ngn(amount);
        prop_assert!(fee <= Decimal::from(100), "fee {fee} exceeds the cap");
        prop_assert!(fee >= Decimal::ZERO);
    }

    /// The crypto conversion path charges no gateway fee.
    #[test]
    fn prop_conversion_breakdown_is_processing_only(amount in naira_amount()) {
        let fees = FeeCalculator::conversion_fees(amount);
        prop_assert_eq!(fees.gateway_fee, Decimal::ZERO);
        prop_assert_eq!(fees.total_fee, fees.processing_fee);
    }

    /// Gateway fees only ever take the three scheduled values.
    #[test]
    fn prop_gateway_fee_in_schedule(amount in naira_amount()) {
        let fee = schedule::gateway_fee_ngn(amount);
        prop_assert!(
            fee == Decimal::from(10) || fee == Decimal::from(25) || fee == Decimal::from(50),
            "unexpected gateway fee {fee}"
        );
    }

    /// A larger amount never lands in a cheaper gateway tier.
    #[test]
    fn prop_gateway_fee_monotone(a in naira_amount(), b in naira_amount()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(schedule::gateway_fee_ngn(low) <= schedule::gateway_fee_ngn(high));
    }
}
