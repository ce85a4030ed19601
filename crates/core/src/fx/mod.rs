//! Currency conversion and spot rate lookup.

pub mod conversion;
pub mod error;
pub mod rate;

pub use conversion::CurrencyConverter;
pub use error::FxError;
pub use rate::{ConversionDirection, Quote, RateFeed, TradeSide};

#[cfg(test)]
pub use rate::MockRateFeed;
