//! Transaction lifecycle states and classification enums.
//!
//! Valid status transitions:
//! - Pending → Success | Completed | Failed | Reversed
//! - Success → Completed | Failed | Reversed
//!
//! `Completed`, `Failed`, and `Reversed` are terminal. `Success` is the
//! processor-reported outcome for a fiat transfer; `Completed` marks a fully
//! settled conversion. A transfer the processor has called successful can
//! still fail or be reversed by a later webhook.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Recorded but not yet settled.
    Pending,
    /// Processor reported the transfer as successful.
    Success,
    /// Fully settled; fees charged and balances moved.
    Completed,
    /// Transfer failed; any debit has been returned.
    Failed,
    /// Transfer reversed after the fact; any debit has been returned.
    Reversed,
}

impl TransferStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Reversed => "reversed",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "reversed" => Some(Self::Reversed),
            _ => None,
        }
    }

    /// Returns true if no further transition is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Reversed)
    }

    /// Returns true if the state machine allows moving to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Pending => !matches!(next, Self::Pending),
            Self::Success => matches!(next, Self::Completed | Self::Failed | Self::Reversed),
            Self::Completed | Self::Failed | Self::Reversed => false,
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which rail a transaction arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferSource {
    /// Fiat payment processor.
    Fiat,
    /// Crypto custody desk.
    Crypto,
}

impl TransferSource {
    /// Returns the string representation of the source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fiat => "fiat",
            Self::Crypto => "crypto",
        }
    }
}

impl fmt::Display for TransferSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of money movement a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    /// Funds entering a wallet.
    Deposit,
    /// Funds leaving a wallet.
    Disbursement,
    /// A crypto deposit settled as naira.
    Conversion,
}

impl TransferType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Disbursement => "disbursement",
            Self::Conversion => "conversion",
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            TransferStatus::Pending,
            TransferStatus::Success,
            TransferStatus::Completed,
            TransferStatus::Failed,
            TransferStatus::Reversed,
        ] {
            assert_eq!(TransferStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TransferStatus::parse("PENDING"), Some(TransferStatus::Pending));
        assert_eq!(TransferStatus::parse("settled"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TransferStatus::Pending.is_terminal());
        assert!(!TransferStatus::Success.is_terminal());
        assert!(TransferStatus::Completed.is_terminal());
        assert!(TransferStatus::Failed.is_terminal());
        assert!(TransferStatus::Reversed.is_terminal());
    }

    #[test]
    fn test_pending_can_reach_every_outcome() {
        for next in [
            TransferStatus::Success,
            TransferStatus::Completed,
            TransferStatus::Failed,
            TransferStatus::Reversed,
        ] {
            assert!(TransferStatus::Pending.can_transition_to(next));
        }
        assert!(!TransferStatus::Pending.can_transition_to(TransferStatus::Pending));
    }

    #[test]
    fn test_success_can_still_be_reversed() {
        assert!(TransferStatus::Success.can_transition_to(TransferStatus::Failed));
        assert!(TransferStatus::Success.can_transition_to(TransferStatus::Reversed));
        assert!(TransferStatus::Success.can_transition_to(TransferStatus::Completed));
    }

    #[test]
    fn test_terminal_states_never_transition() {
        for terminal in [
            TransferStatus::Completed,
            TransferStatus::Failed,
            TransferStatus::Reversed,
        ] {
            for next in [
                TransferStatus::Pending,
                TransferStatus::Success,
                TransferStatus::Completed,
                TransferStatus::Failed,
                TransferStatus::Reversed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }
}
