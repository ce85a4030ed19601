//! Wallet repository for balance database operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use kobo_shared::types::Currency;

use crate::entities::wallets;

/// Wallet repository for balance operations.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the wallet owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<wallets::Model>, DbErr> {
        wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Creates an empty wallet for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(&self, user_id: Uuid) -> Result<wallets::Model, DbErr> {
        let now = Utc::now().into();

        let wallet = wallets::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            ngn_balance: Set(Decimal::ZERO),
            usd_balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        wallet.insert(&self.db).await
    }

    /// Adjusts one currency balance by a signed delta in a single statement.
    ///
    /// The arithmetic happens inside the database so concurrent adjustments
    /// never clobber each other. Returns the number of affected rows; zero
    /// means no wallet exists for the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn adjust_balance(
        &self,
        user_id: Uuid,
        currency: Currency,
        delta: Decimal,
    ) -> Result<u64, DbErr> {
        let column = match currency {
            Currency::Ngn => wallets::Column::NgnBalance,
            Currency::Usd => wallets::Column::UsdBalance,
        };
        let now = Utc::now();

        let result = wallets::Entity::update_many()
            .col_expr(
                column,
                sea_orm::sea_query::Expr::col(column).add(delta),
            )
            .col_expr(
                wallets::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(wallets::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
