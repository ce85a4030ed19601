//! Spot rate repository for desk-published exchange rates.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use kobo_core::fx::TradeSide;
use kobo_shared::types::Currency;

use crate::entities::sea_orm_active_enums::{CurrencyCode, RateSide};
use crate::entities::spot_rates;

/// Spot rate repository.
#[derive(Debug, Clone)]
pub struct SpotRateRepository {
    db: DatabaseConnection,
}

impl SpotRateRepository {
    /// Creates a new spot rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the most recently published rate for a currency and side.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest(
        &self,
        currency: Currency,
        side: TradeSide,
    ) -> Result<Option<spot_rates::Model>, DbErr> {
        spot_rates::Entity::find()
            .filter(spot_rates::Column::Currency.eq(CurrencyCode::from(currency)))
            .filter(spot_rates::Column::Side.eq(RateSide::from(side)))
            .order_by_desc(spot_rates::Column::CreatedAt)
            .one(&self.db)
            .await
    }

    /// Publishes a new spot rate. Older rows are kept as history.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert(
        &self,
        currency: Currency,
        side: TradeSide,
        rate: Decimal,
    ) -> Result<spot_rates::Model, DbErr> {
        let row = spot_rates::ActiveModel {
            id: Set(Uuid::now_v7()),
            currency: Set(currency.into()),
            side: Set(side.into()),
            rate: Set(rate),
            created_at: Set(Utc::now().into()),
        };

        row.insert(&self.db).await
    }
}
