//! Fee schedule constants and pure tier lookups.
//!
//! All amounts are in major units. Tier boundaries are defined on the
//! naira-equivalent amount regardless of the settlement currency, so a
//! dollar transfer is first converted before a tier is chosen.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places carried by fee amounts.
const FEE_DECIMALS: u32 = 2;

/// Flat processing fee for naira transfers, in naira.
#[must_use]
pub fn flat_processing_fee_ngn() -> Decimal {
    Decimal::from(25)
}

/// Percentage component of the dollar processing fee (0.1%).
#[must_use]
pub fn processing_fee_rate() -> Decimal {
    Decimal::new(1, 3)
}

/// Hard cap on the dollar processing fee, in dollars.
#[must_use]
pub fn processing_fee_cap_usd() -> Decimal {
    Decimal::from(2)
}

/// Gateway fee tier for the given naira-equivalent amount, in naira.
///
/// Tiers: up to 5,000 pays 10; up to 50,000 pays 25; above that pays 50.
#[must_use]
pub fn gateway_fee_ngn(naira_amount: Decimal) -> Decimal {
    if naira_amount <= Decimal::from(5_000) {
        Decimal::from(10)
    } else if naira_amount <= Decimal::from(50_000) {
        Decimal::from(25)
    } else {
        Decimal::from(50)
    }
}

/// Fee for converting a crypto deposit into naira: 0.1% of the
/// naira-equivalent amount, capped at 100 naira.
#[must_use]
pub fn conversion_fee_ngn(naira_amount: Decimal) -> Decimal {
    let fee = round_fee(naira_amount * processing_fee_rate());
    fee.min(Decimal::from(100))
}

/// Rounds a fee to 2 decimal places using banker's rounding.
#[must_use]
pub fn round_fee(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(FEE_DECIMALS, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(100), dec!(10))]
    #[case(dec!(5000), dec!(10))]
    #[case(dec!(5000.01), dec!(25))]
    #[case(dec!(50000), dec!(25))]
    #[case(dec!(50000.01), dec!(50))]
    #[case(dec!(1000000), dec!(50))]
    fn test_gateway_tier_boundaries(#[case] amount: Decimal, #[case] expected: Decimal) {
        assert_eq!(gateway_fee_ngn(amount), expected);
    }

    #[test]
    fn test_conversion_fee_below_cap() {
        // 0.1% of 15,000 is 15
        assert_eq!(conversion_fee_ngn(dec!(15000)), dec!(15.00));
    }

    #[test]
    fn test_conversion_fee_hits_cap() {
        // 0.1% of 1,000,000 would be 1,000; capped at 100
        assert_eq!(conversion_fee_ngn(dec!(1000000)), dec!(100));
    }

    #[test]
    fn test_conversion_fee_at_cap_boundary() {
        // 0.1% of 100,000 is exactly the cap
        assert_eq!(conversion_fee_ngn(dec!(100000)), dec!(100.00));
    }

    #[test]
    fn test_round_fee_bankers() {
        assert_eq!(round_fee(dec!(0.125)), dec!(0.12));
        assert_eq!(round_fee(dec!(0.135)), dec!(0.14));
        assert_eq!(round_fee(dec!(25)), dec!(25));
    }
}
