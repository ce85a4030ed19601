//! Fee computation for transfers and crypto conversions.
//!
//! Fees are computed once, at settlement time, in the currency of the
//! transaction. Dollar fees depend on the live spot rate because the tier
//! schedule is defined on naira amounts.

use std::sync::Arc;

use rust_decimal::Decimal;

use kobo_shared::types::Currency;

use crate::fx::{ConversionDirection, CurrencyConverter, FxError};

use super::schedule;

/// Breakdown of the fees charged on a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    /// Platform processing fee.
    pub processing_fee: Decimal,
    /// Card/bank gateway fee. Zero for crypto conversions.
    pub gateway_fee: Decimal,
    /// Sum of processing and gateway fees.
    pub total_fee: Decimal,
}

impl FeeBreakdown {
    /// Creates a breakdown from its parts.
    #[must_use]
    pub fn new(processing_fee: Decimal, gateway_fee: Decimal) -> Self {
        Self {
            processing_fee,
            gateway_fee,
            total_fee: processing_fee + gateway_fee,
        }
    }
}

/// Computes fees for fiat transfers and crypto-to-naira conversions.
pub struct FeeCalculator {
    converter: Arc<CurrencyConverter>,
}

impl FeeCalculator {
    /// Creates a calculator backed by the given converter.
    #[must_use]
    pub fn new(converter: Arc<CurrencyConverter>) -> Self {
        Self { converter }
    }

    /// Computes processing and gateway fees for a fiat transfer.
    ///
    /// Naira transfers pay the flat processing fee plus the gateway tier
    /// for the amount. Dollar transfers pay 0.1% plus the dollar value of
    /// the flat naira fee, hard-capped at 2 dollars, plus the dollar value
    /// of the gateway tier chosen on the naira-equivalent amount.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::RateUnavailable`] when a dollar fee is requested
    /// and no spot rate is on record.
    pub async fn transfer_fees(
        &self,
        amount: Decimal,
        currency: Currency,
    ) -> Result<FeeBreakdown, FxError> {
        match currency {
            Currency::Ngn => {
                let processing = schedule::flat_processing_fee_ngn();
                let gateway = schedule::gateway_fee_ngn(amount);
                Ok(FeeBreakdown::new(processing, gateway))
            }
            Currency::Usd => {
                let naira_equivalent = self
                    .converter
                    .convert(amount, ConversionDirection::UsdToNgn)
                    .await?
                    .price;

                let gateway_ngn = schedule::gateway_fee_ngn(naira_equivalent);
                let gateway = self
                    .converter
                    .convert(gateway_ngn, ConversionDirection::NgnToUsd)
                    .await?
                    .price;

                let flat_usd = self
                    .converter
                    .convert(schedule::flat_processing_fee_ngn(), ConversionDirection::NgnToUsd)
                    .await?
                    .price;

                let percent = amount * schedule::processing_fee_rate();
                let processing = schedule::round_fee(percent + flat_usd)
                    .min(schedule::processing_fee_cap_usd());

                Ok(FeeBreakdown::new(processing, schedule::round_fee(gateway)))
            }
        }
    }

    /// Computes the fee for settling a verified crypto deposit as naira.
    ///
    /// No gateway is involved, so the processing fee is the whole fee.
    #[must_use]
    pub fn conversion_fees(naira_amount: Decimal) -> FeeBreakdown {
        let fee = schedule::conversion_fee_ngn(naira_amount);
        FeeBreakdown {
            processing_fee: fee,
            gateway_fee: Decimal::ZERO,
            total_fee: fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::rate::TradeSide;
    use crate::fx::MockRateFeed;
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    fn calculator(buy: Decimal, sell: Decimal) -> FeeCalculator {
        let mut feed = MockRateFeed::new();
        feed.expect_latest_rate()
            .with(eq(Currency::Usd), eq(TradeSide::Buy))
            .returning(move |_, _| Ok(Some(buy)));
        feed.expect_latest_rate()
            .with(eq(Currency::Usd), eq(TradeSide::Sell))
            .returning(move |_, _| Ok(Some(sell)));
        FeeCalculator::new(Arc::new(CurrencyConverter::new(Arc::new(feed))))
    }

    /// Naira fees never touch the rate feed.
    fn naira_only_calculator() -> FeeCalculator {
        let feed = MockRateFeed::new();
        FeeCalculator::new(Arc::new(CurrencyConverter::new(Arc::new(feed))))
    }

    #[tokio::test]
    async fn test_naira_transfer_small_tier() {
        let fees = naira_only_calculator()
            .transfer_fees(dec!(1000), Currency::Ngn)
            .await
            .unwrap();

        assert_eq!(fees.processing_fee, dec!(25));
        assert_eq!(fees.gateway_fee, dec!(10));
        assert_eq!(fees.total_fee, dec!(35));
    }

    #[tokio::test]
    async fn test_naira_transfer_middle_tier() {
        let fees = naira_only_calculator()
            .transfer_fees(dec!(20000), Currency::Ngn)
            .await
            .unwrap();

        assert_eq!(fees.gateway_fee, dec!(25));
        assert_eq!(fees.total_fee, dec!(50));
    }

    #[tokio::test]
    async fn test_naira_transfer_top_tier() {
        let fees = naira_only_calculator()
            .transfer_fees(dec!(75000), Currency::Ngn)
            .await
            .unwrap();

        assert_eq!(fees.gateway_fee, dec!(50));
        assert_eq!(fees.total_fee, dec!(75));
    }

    #[tokio::test]
    async fn test_dollar_transfer_fees() {
        // Buy 1500, sell 1600. 100 USD is 150,000 NGN equivalent, which
        // lands in the top gateway tier (50 NGN = 0.03 USD). Processing is
        // 0.1 USD + 25 NGN in dollars (0.0156) rounded to 0.12.
        let fees = calculator(dec!(1500), dec!(1600))
            .transfer_fees(dec!(100), Currency::Usd)
            .await
            .unwrap();

        assert_eq!(fees.processing_fee, dec!(0.12));
        assert_eq!(fees.gateway_fee, dec!(0.03));
        assert_eq!(fees.total_fee, dec!(0.15));
    }

    #[tokio::test]
    async fn test_dollar_processing_fee_hard_cap() {
        let fees = calculator(dec!(1500), dec!(1600))
            .transfer_fees(dec!(1000000), Currency::Usd)
            .await
            .unwrap();

        assert_eq!(fees.processing_fee, dec!(2));
    }

    #[tokio::test]
    async fn test_dollar_fees_require_a_rate() {
        let mut feed = MockRateFeed::new();
        feed.expect_latest_rate().returning(|_, _| Ok(None));
        let calculator = FeeCalculator::new(Arc::new(CurrencyConverter::new(Arc::new(feed))));

        let err = calculator
            .transfer_fees(dec!(100), Currency::Usd)
            .await
            .unwrap_err();

        assert!(matches!(err, FxError::RateUnavailable { .. }));
    }

    #[test]
    fn test_conversion_fees_have_no_gateway_component() {
        let fees = FeeCalculator::conversion_fees(dec!(15000));

        assert_eq!(fees.processing_fee, dec!(15.00));
        assert_eq!(fees.gateway_fee, Decimal::ZERO);
        assert_eq!(fees.total_fee, fees.processing_fee);
    }

    #[test]
    fn test_conversion_fees_capped() {
        let fees = FeeCalculator::conversion_fees(dec!(1000000));

        assert_eq!(fees.total_fee, dec!(100));
    }
}
