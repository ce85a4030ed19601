//! `SeaORM` entity definitions for the reconciliation schema.

pub mod sea_orm_active_enums;

pub mod notifications;
pub mod spot_rates;
pub mod transactions;
pub mod wallets;
