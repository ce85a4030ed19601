//! `SeaORM` adapters for the reconciliation engine's ports.
//!
//! [`SeaLedgerStore`] backs the ledger persistence port with the wallet,
//! transaction, and notification repositories. [`DbRateFeed`] reads the
//! latest desk-published spot rate. Unique violations surface as
//! [`StoreError::Duplicate`] so the engine can treat them as redeliveries.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use kobo_core::fx::{FxError, RateFeed, TradeSide};
use kobo_core::reconcile::{
    LedgerStore, LedgerTransaction, NewNotification, NewTransaction, StoreError, TransferStatus,
};
use kobo_shared::types::{Currency, UserId};

use crate::repositories::{
    NotificationRepository, SpotRateRepository, TransactionRepository, WalletRepository,
};

fn map_store_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => StoreError::Duplicate(message),
        _ => StoreError::Backend(err.to_string()),
    }
}

/// Ledger store backed by `PostgreSQL` through `SeaORM`.
#[derive(Debug, Clone)]
pub struct SeaLedgerStore {
    transactions: TransactionRepository,
    wallets: WalletRepository,
    notifications: NotificationRepository,
}

impl SeaLedgerStore {
    /// Creates a ledger store on top of the given connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            transactions: TransactionRepository::new(db.clone()),
            wallets: WalletRepository::new(db.clone()),
            notifications: NotificationRepository::new(db),
        }
    }
}

#[async_trait]
impl LedgerStore for SeaLedgerStore {
    async fn find_transaction_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<LedgerTransaction>, StoreError> {
        let model = self
            .transactions
            .find_by_reference(reference)
            .await
            .map_err(map_store_err)?;
        Ok(model.map(Into::into))
    }

    async fn find_transaction_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<LedgerTransaction>, StoreError> {
        let model = self
            .transactions
            .find_by_idempotency_key(key)
            .await
            .map_err(map_store_err)?;
        Ok(model.map(Into::into))
    }

    async fn create_transaction(
        &self,
        new: NewTransaction,
    ) -> Result<LedgerTransaction, StoreError> {
        let model = self
            .transactions
            .insert(&new)
            .await
            .map_err(map_store_err)?;
        Ok(model.into())
    }

    async fn update_transaction_status(
        &self,
        reference: &str,
        status: TransferStatus,
    ) -> Result<(), StoreError> {
        let updated = self
            .transactions
            .set_status(reference, status)
            .await
            .map_err(map_store_err)?;
        if updated {
            Ok(())
        } else {
            Err(StoreError::TransactionNotFound(reference.to_string()))
        }
    }

    async fn increment_wallet_balance(
        &self,
        user_id: UserId,
        currency: Currency,
        delta: Decimal,
    ) -> Result<(), StoreError> {
        let rows = self
            .wallets
            .adjust_balance(user_id.into_inner(), currency, delta)
            .await
            .map_err(map_store_err)?;
        if rows == 0 {
            return Err(StoreError::WalletNotFound(user_id));
        }
        Ok(())
    }

    async fn decrement_wallet_balance(
        &self,
        user_id: UserId,
        currency: Currency,
        delta: Decimal,
    ) -> Result<(), StoreError> {
        let rows = self
            .wallets
            .adjust_balance(user_id.into_inner(), currency, -delta)
            .await
            .map_err(map_store_err)?;
        if rows == 0 {
            return Err(StoreError::WalletNotFound(user_id));
        }
        Ok(())
    }

    async fn count_notifications(&self, reference: &str) -> Result<u64, StoreError> {
        self.notifications
            .count_for_reference(reference)
            .await
            .map_err(map_store_err)
    }

    async fn create_notification(&self, new: NewNotification) -> Result<(), StoreError> {
        self.notifications
            .insert(&new)
            .await
            .map_err(map_store_err)?;
        Ok(())
    }
}

/// Rate feed that reads desk-published spot rates from the database.
#[derive(Debug, Clone)]
pub struct DbRateFeed {
    rates: SpotRateRepository,
}

impl DbRateFeed {
    /// Creates a rate feed on top of the given connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            rates: SpotRateRepository::new(db),
        }
    }
}

#[async_trait]
impl RateFeed for DbRateFeed {
    async fn latest_rate(
        &self,
        currency: Currency,
        side: TradeSide,
    ) -> Result<Option<Decimal>, FxError> {
        let model = self
            .rates
            .latest(currency, side)
            .await
            .map_err(|err| FxError::Feed(err.to_string()))?;
        Ok(model.map(|rate| rate.rate))
    }
}
