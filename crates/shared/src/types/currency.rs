//! Settlement currencies and minor-unit helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` in major units.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Nigerian Naira
    Ngn,
    /// US Dollar
    Usd,
}

impl Currency {
    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ngn => "NGN",
            Self::Usd => "USD",
        }
    }

    /// Converts an amount in minor units (kobo, cents) to major units.
    ///
    /// Fiat processors quote amounts in minor units on the wire; the
    /// ledger stores major units with two decimal places.
    #[must_use]
    pub fn from_minor_units(self, minor: i64) -> Decimal {
        Decimal::new(minor, 2)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NGN" => Ok(Self::Ngn),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Ngn.to_string(), "NGN");
        assert_eq!(Currency::Usd.to_string(), "USD");
    }

    #[rstest]
    #[case("NGN", Currency::Ngn)]
    #[case("ngn", Currency::Ngn)]
    #[case("USD", Currency::Usd)]
    #[case("usd", Currency::Usd)]
    fn test_currency_from_str(#[case] input: &str, #[case] expected: Currency) {
        assert_eq!(Currency::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        assert!(Currency::from_str("EUR").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(Currency::Ngn.from_minor_units(500_000), dec!(5000.00));
        assert_eq!(Currency::Usd.from_minor_units(250), dec!(2.50));
        assert_eq!(Currency::Ngn.from_minor_units(1), dec!(0.01));
        assert_eq!(Currency::Ngn.from_minor_units(0), Decimal::ZERO);
    }
}
