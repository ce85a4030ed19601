//! Spot rate types and the rate feed port.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kobo_shared::types::Currency;

use super::error::FxError;

/// Side of the spot quote a conversion settles against.
///
/// Rates are quoted as naira per dollar. The desk buys dollars at the
/// `Buy` rate and sells them at the `Sell` rate; the spread between the
/// two sides is the desk's margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// The desk buys the quoted currency at this rate.
    Buy,
    /// The desk sells the quoted currency at this rate.
    Sell,
}

impl TradeSide {
    /// Returns the string representation of the side.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    /// Parses a side from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a conversion between the two supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDirection {
    /// Convert naira into dollars.
    NgnToUsd,
    /// Convert dollars into naira.
    UsdToNgn,
}

impl ConversionDirection {
    /// Returns the quote side this direction settles against.
    ///
    /// Converting dollars into naira settles at the buy rate; converting
    /// naira into dollars settles at the sell rate.
    #[must_use]
    pub const fn trade_side(self) -> TradeSide {
        match self {
            Self::UsdToNgn => TradeSide::Buy,
            Self::NgnToUsd => TradeSide::Sell,
        }
    }
}

/// Result of a conversion: the converted price and the rate used.
///
/// Callers snapshot `rate` into the ledger record so a settlement stays
/// auditable after the spot rate moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Converted amount in the target currency.
    pub price: Decimal,
    /// Spot rate (naira per dollar) the conversion settled at.
    pub rate: Decimal,
}

/// Port for the external spot rate feed.
///
/// The feed is written by an out-of-scope price collaborator; this
/// subsystem only reads the latest quote per trade side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateFeed: Send + Sync {
    /// Returns the most recent rate quoted for `currency` on `side`,
    /// or `None` when no rate is on record.
    async fn latest_rate(
        &self,
        currency: Currency,
        side: TradeSide,
    ) -> Result<Option<Decimal>, FxError>;
}
