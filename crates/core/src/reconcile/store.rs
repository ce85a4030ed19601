//! Persistence port for the reconciliation engine.
//!
//! The engine never talks to a database directly; it issues the operations
//! below and lets an adapter crate carry them out. Balance mutations are
//! expressed as increments and decrements so the adapter can make them
//! atomic, and unique constraints on `reference` and `idempotency_key` back
//! up the explicit existence checks against races.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use kobo_shared::types::{Currency, TransactionId, UserId};

use super::status::{TransferSource, TransferStatus, TransferType};

/// Durable record of one money movement.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerTransaction {
    /// Internal identifier.
    pub id: TransactionId,
    /// Provider-assigned or synthesized unique reference.
    pub reference: String,
    /// Provider-issued deposit key; only crypto deposits carry one.
    pub idempotency_key: Option<String>,
    /// Wallet owner.
    pub user_id: UserId,
    /// Rail the transaction arrived on.
    pub source: TransferSource,
    /// Kind of money movement.
    pub transfer_type: TransferType,
    /// Lifecycle state.
    pub status: TransferStatus,
    /// Gross amount in major units.
    pub amount: Decimal,
    /// Amount actually credited or debited after fees.
    pub settlement_amount: Decimal,
    /// Sum of all fees charged.
    pub total_fee: Decimal,
    /// Platform processing fee component.
    pub processing_fee: Decimal,
    /// Spot rate snapshot taken at settlement, when a conversion happened.
    pub dollar_rate: Option<Decimal>,
    /// Currency the record is denominated in.
    pub currency: Currency,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a transaction record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Provider-assigned or synthesized unique reference.
    pub reference: String,
    /// Provider-issued deposit key; only crypto deposits carry one.
    pub idempotency_key: Option<String>,
    /// Wallet owner.
    pub user_id: UserId,
    /// Rail the transaction arrived on.
    pub source: TransferSource,
    /// Kind of money movement.
    pub transfer_type: TransferType,
    /// Initial lifecycle state.
    pub status: TransferStatus,
    /// Gross amount in major units.
    pub amount: Decimal,
    /// Amount actually credited or debited after fees.
    pub settlement_amount: Decimal,
    /// Sum of all fees charged.
    pub total_fee: Decimal,
    /// Platform processing fee component.
    pub processing_fee: Decimal,
    /// Spot rate snapshot, when a conversion happened.
    pub dollar_rate: Option<Decimal>,
    /// Currency the record is denominated in.
    pub currency: Currency,
}

/// Per-user balance container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wallet {
    /// Owner of the balances.
    pub user_id: UserId,
    /// Naira balance in major units.
    pub ngn_balance: Decimal,
    /// Dollar balance in major units.
    pub usd_balance: Decimal,
}

/// Fields for recording a user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// Short headline.
    pub title: String,
    /// Longer human-readable description.
    pub description: String,
    /// Transaction reference the notice is about.
    pub reference: String,
    /// User the notice is addressed to.
    pub user_id: UserId,
}

/// Errors surfaced by ledger store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write; the reference or idempotency
    /// key is already recorded.
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// No wallet exists for the user.
    #[error("Wallet not found for user {0}")]
    WalletNotFound(UserId),

    /// No transaction matches the reference being updated.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// The backing store failed.
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Port for ledger persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Looks up a transaction by its unique reference.
    async fn find_transaction_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<LedgerTransaction>, StoreError>;

    /// Looks up a transaction by its provider-issued idempotency key.
    async fn find_transaction_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<LedgerTransaction>, StoreError>;

    /// Inserts a transaction record.
    ///
    /// Returns [`StoreError::Duplicate`] when the reference or idempotency
    /// key is already recorded.
    async fn create_transaction(
        &self,
        new: NewTransaction,
    ) -> Result<LedgerTransaction, StoreError>;

    /// Updates the status of the transaction with the given reference.
    async fn update_transaction_status(
        &self,
        reference: &str,
        status: TransferStatus,
    ) -> Result<(), StoreError>;

    /// Atomically adds `delta` to the user's balance in `currency`.
    async fn increment_wallet_balance(
        &self,
        user_id: UserId,
        currency: Currency,
        delta: Decimal,
    ) -> Result<(), StoreError>;

    /// Atomically subtracts `delta` from the user's balance in `currency`.
    async fn decrement_wallet_balance(
        &self,
        user_id: UserId,
        currency: Currency,
        delta: Decimal,
    ) -> Result<(), StoreError>;

    /// Counts notifications recorded against a reference.
    async fn count_notifications(&self, reference: &str) -> Result<u64, StoreError>;

    /// Records a user-facing notification.
    async fn create_notification(&self, new: NewNotification) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::Duplicate("tr-1".into()).to_string(),
            "Duplicate record: tr-1"
        );
        assert_eq!(
            StoreError::TransactionNotFound("tr-2".into()).to_string(),
            "Transaction not found: tr-2"
        );
        assert_eq!(
            StoreError::Backend("connection reset".into()).to_string(),
            "Storage error: connection reset"
        );
    }
}
