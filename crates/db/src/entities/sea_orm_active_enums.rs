//! `SeaORM` active enums mapping the `PostgreSQL` enum types.
//!
//! Each enum mirrors a domain enum from `kobo-core`; the `From`
//! conversions at the bottom keep the database strings decoupled from the
//! domain types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use kobo_core::fx::TradeSide;
use kobo_core::reconcile;
use kobo_shared::types::Currency;

/// Rail a transaction arrived on.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transfer_source")]
pub enum TransferSource {
    #[sea_orm(string_value = "fiat")]
    Fiat,
    #[sea_orm(string_value = "crypto")]
    Crypto,
}

/// Kind of money movement.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transfer_type")]
pub enum TransferType {
    #[sea_orm(string_value = "deposit")]
    Deposit,
    #[sea_orm(string_value = "disbursement")]
    Disbursement,
    #[sea_orm(string_value = "conversion")]
    Conversion,
}

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transfer_status")]
pub enum TransferStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

/// Supported wallet currencies.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency_code")]
pub enum CurrencyCode {
    #[sea_orm(string_value = "NGN")]
    Ngn,
    #[sea_orm(string_value = "USD")]
    Usd,
}

/// Which side of the spread a stored spot rate quotes.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "rate_side")]
pub enum RateSide {
    #[sea_orm(string_value = "buy")]
    Buy,
    #[sea_orm(string_value = "sell")]
    Sell,
}

impl From<reconcile::TransferSource> for TransferSource {
    fn from(source: reconcile::TransferSource) -> Self {
        match source {
            reconcile::TransferSource::Fiat => Self::Fiat,
            reconcile::TransferSource::Crypto => Self::Crypto,
        }
    }
}

impl From<TransferSource> for reconcile::TransferSource {
    fn from(source: TransferSource) -> Self {
        match source {
            TransferSource::Fiat => Self::Fiat,
            TransferSource::Crypto => Self::Crypto,
        }
    }
}

impl From<reconcile::TransferType> for TransferType {
    fn from(transfer_type: reconcile::TransferType) -> Self {
        match transfer_type {
            reconcile::TransferType::Deposit => Self::Deposit,
            reconcile::TransferType::Disbursement => Self::Disbursement,
            reconcile::TransferType::Conversion => Self::Conversion,
        }
    }
}

impl From<TransferType> for reconcile::TransferType {
    fn from(transfer_type: TransferType) -> Self {
        match transfer_type {
            TransferType::Deposit => Self::Deposit,
            TransferType::Disbursement => Self::Disbursement,
            TransferType::Conversion => Self::Conversion,
        }
    }
}

impl From<reconcile::TransferStatus> for TransferStatus {
    fn from(status: reconcile::TransferStatus) -> Self {
        match status {
            reconcile::TransferStatus::Pending => Self::Pending,
            reconcile::TransferStatus::Success => Self::Success,
            reconcile::TransferStatus::Completed => Self::Completed,
            reconcile::TransferStatus::Failed => Self::Failed,
            reconcile::TransferStatus::Reversed => Self::Reversed,
        }
    }
}

impl From<TransferStatus> for reconcile::TransferStatus {
    fn from(status: TransferStatus) -> Self {
        match status {
            TransferStatus::Pending => Self::Pending,
            TransferStatus::Success => Self::Success,
            TransferStatus::Completed => Self::Completed,
            TransferStatus::Failed => Self::Failed,
            TransferStatus::Reversed => Self::Reversed,
        }
    }
}

impl From<Currency> for CurrencyCode {
    fn from(currency: Currency) -> Self {
        match currency {
            Currency::Ngn => Self::Ngn,
            Currency::Usd => Self::Usd,
        }
    }
}

impl From<CurrencyCode> for Currency {
    fn from(code: CurrencyCode) -> Self {
        match code {
            CurrencyCode::Ngn => Self::Ngn,
            CurrencyCode::Usd => Self::Usd,
        }
    }
}

impl From<TradeSide> for RateSide {
    fn from(side: TradeSide) -> Self {
        match side {
            TradeSide::Buy => Self::Buy,
            TradeSide::Sell => Self::Sell,
        }
    }
}

impl From<RateSide> for TradeSide {
    fn from(side: RateSide) -> Self {
        match side {
            RateSide::Buy => Self::Buy,
            RateSide::Sell => Self::Sell,
        }
    }
}
