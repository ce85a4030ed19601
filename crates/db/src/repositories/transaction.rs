//! Transaction repository for ledger transaction database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use kobo_core::reconcile::{LedgerTransaction, NewTransaction, TransferStatus};
use kobo_shared::types::{TransactionId, UserId};

use crate::entities::transactions;

impl From<transactions::Model> for LedgerTransaction {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: TransactionId::from_uuid(model.id),
            reference: model.reference,
            idempotency_key: model.idempotency_key,
            user_id: UserId::from_uuid(model.user_id),
            source: model.source.into(),
            transfer_type: model.transfer_type.into(),
            status: model.status.into(),
            amount: model.amount,
            settlement_amount: model.settlement_amount,
            total_fee: model.total_fee,
            processing_fee: model.processing_fee,
            dollar_rate: model.dollar_rate,
            currency: model.currency.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Transaction repository for ledger record operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a transaction by its unique reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::Reference.eq(reference))
            .one(&self.db)
            .await
    }

    /// Finds a transaction by its provider-issued idempotency key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::IdempotencyKey.eq(key))
            .one(&self.db)
            .await
    }

    /// Inserts a new transaction record.
    ///
    /// The unique constraints on `reference` and `idempotency_key` reject
    /// a second insert for the same movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including unique violations.
    pub async fn insert(&self, new: &NewTransaction) -> Result<transactions::Model, DbErr> {
        let now = Utc::now().into();

        let transaction = transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            reference: Set(new.reference.clone()),
            idempotency_key: Set(new.idempotency_key.clone()),
            user_id: Set(new.user_id.into_inner()),
            source: Set(new.source.into()),
            transfer_type: Set(new.transfer_type.into()),
            status: Set(new.status.into()),
            amount: Set(new.amount),
            settlement_amount: Set(new.settlement_amount),
            total_fee: Set(new.total_fee),
            processing_fee: Set(new.processing_fee),
            dollar_rate: Set(new.dollar_rate),
            currency: Set(new.currency.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        transaction.insert(&self.db).await
    }

    /// Updates the status of the transaction with the given reference.
    ///
    /// Returns `false` when no transaction matches the reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn set_status(
        &self,
        reference: &str,
        status: TransferStatus,
    ) -> Result<bool, DbErr> {
        let Some(model) = self.find_by_reference(reference).await? else {
            return Ok(false);
        };

        let mut active: transactions::ActiveModel = model.into();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(true)
    }
}
