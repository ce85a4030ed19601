//! Normalized inbound webhook events.
//!
//! Provider payloads are mapped into these variants at the HTTP boundary.
//! The two rails use different status vocabularies; nothing downstream of
//! this type ever branches on a raw provider string.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use kobo_shared::types::Currency;

/// A normalized inbound webhook event.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    /// Funds observed entering a custody address. Acknowledged only; the
    /// deposit is not credited until the desk reports it as created.
    CryptoIncoming(CryptoNotice),
    /// A custody deposit record was created; verify it against the desk
    /// and settle it as naira.
    CryptoDepositCreated(CryptoNotice),
    /// The fiat processor reports a transfer as successful.
    TransferSucceeded(TransferNotice),
    /// The fiat processor reports a transfer as failed.
    TransferFailed(TransferNotice),
    /// The fiat processor reports a settled transfer as reversed.
    TransferReversed(TransferNotice),
}

/// Fields carried by custody-side notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoNotice {
    /// Custody-side transaction reference.
    pub reference: String,
    /// When the provider says the event occurred.
    pub occurred_at: DateTime<Utc>,
}

/// Fields carried by processor-side notices.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferNotice {
    /// Processor-side transfer reference.
    pub reference: String,
    /// Gross amount in major units, already divided down from the wire's
    /// minor units.
    pub amount: Decimal,
    /// Currency the transfer settles in.
    pub currency: Currency,
    /// Raw provider status string, kept for logs only.
    pub raw_status: String,
    /// When the provider says the event occurred.
    pub occurred_at: DateTime<Utc>,
}

impl TransferEvent {
    /// Reference correlating this event with a ledger transaction.
    #[must_use]
    pub fn reference(&self) -> &str {
        match self {
            Self::CryptoIncoming(notice) | Self::CryptoDepositCreated(notice) => &notice.reference,
            Self::TransferSucceeded(notice)
            | Self::TransferFailed(notice)
            | Self::TransferReversed(notice) => &notice.reference,
        }
    }

    /// Provider-facing event name, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CryptoIncoming(_) => "crypto.incoming",
            Self::CryptoDepositCreated(_) => "crypto.deposit.created",
            Self::TransferSucceeded(_) => "transfer.success",
            Self::TransferFailed(_) => "transfer.failed",
            Self::TransferReversed(_) => "transfer.reversed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn notice(reference: &str) -> TransferNotice {
        TransferNotice {
            reference: reference.to_string(),
            amount: dec!(100),
            currency: Currency::Ngn,
            raw_status: "success".to_string(),
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_reference_accessor() {
        let event = TransferEvent::TransferSucceeded(notice("tr-1"));
        assert_eq!(event.reference(), "tr-1");

        let event = TransferEvent::CryptoDepositCreated(CryptoNotice {
            reference: "cust-9".to_string(),
            occurred_at: Utc::now(),
        });
        assert_eq!(event.reference(), "cust-9");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(
            TransferEvent::TransferFailed(notice("x")).kind(),
            "transfer.failed"
        );
        assert_eq!(
            TransferEvent::TransferReversed(notice("x")).kind(),
            "transfer.reversed"
        );
    }
}
