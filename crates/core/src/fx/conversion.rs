//! Currency conversion against the latest spot quote.
//!
//! CRITICAL: Rounding strategy for conversions:
//! - Always round to 4 decimal places
//! - Use banker's rounding (round half to even)
//! - Return the rate alongside the price so callers can snapshot it

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};

use kobo_shared::types::Currency;

use super::error::FxError;
use super::rate::{ConversionDirection, Quote, RateFeed};

/// Decimal places carried by converted amounts.
const CONVERSION_DECIMALS: u32 = 4;

/// Converts between naira and dollars using the latest spot rate.
pub struct CurrencyConverter {
    feed: Arc<dyn RateFeed>,
}

impl CurrencyConverter {
    /// Creates a converter backed by the given rate feed.
    #[must_use]
    pub fn new(feed: Arc<dyn RateFeed>) -> Self {
        Self { feed }
    }

    /// Converts `amount` in the given direction at the latest spot rate.
    ///
    /// Dollar-to-naira conversions multiply by the buy rate; naira-to-dollar
    /// conversions divide by the sell rate. The returned quote carries the
    /// rate used so callers can persist it with the settlement.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::RateUnavailable`] when no rate is on record or the
    /// recorded rate is zero or negative. A missing quote is never papered
    /// over with a rate of 1.
    pub async fn convert(
        &self,
        amount: Decimal,
        direction: ConversionDirection,
    ) -> Result<Quote, FxError> {
        let side = direction.trade_side();
        let rate = self
            .feed
            .latest_rate(Currency::Usd, side)
            .await?
            .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
            .ok_or(FxError::RateUnavailable {
                currency: Currency::Usd,
                side,
            })?;

        let price = match direction {
            ConversionDirection::UsdToNgn => amount * rate,
            ConversionDirection::NgnToUsd => amount / rate,
        };

        Ok(Quote {
            price: round_converted(price),
            rate,
        })
    }
}

/// Rounds a converted amount to 4 decimal places using banker's rounding.
#[must_use]
pub fn round_converted(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CONVERSION_DECIMALS, RoundingStrategy::MidpointNearestEven)
}
