//! Currency conversion errors.

use thiserror::Error;

use kobo_shared::types::Currency;

use super::rate::TradeSide;

/// Errors that can occur during currency conversion.
#[derive(Debug, Error)]
pub enum FxError {
    /// No usable spot rate is on record for the requested side.
    ///
    /// Callers must treat this as a hard failure; conversions never fall
    /// back to a default rate.
    #[error("No {side} rate available for {currency}")]
    RateUnavailable {
        /// Currency the quote was requested for.
        currency: Currency,
        /// Side of the quote that was requested.
        side: TradeSide,
    },

    /// The rate feed could not be queried.
    #[error("Rate feed error: {0}")]
    Feed(String),
}
