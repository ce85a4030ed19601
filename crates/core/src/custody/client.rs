//! Typed custody desk port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use kobo_shared::types::UserId;

use super::error::CustodyError;

/// A crypto deposit as reported by the custody desk's query API.
///
/// Webhook payloads are not trusted as final truth; the reconciler always
/// re-queries the desk and settles from this record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedDeposit {
    /// Custody-side transaction reference.
    pub reference: String,
    /// Key identifying the underlying deposit across redeliveries.
    pub idempotency_key: String,
    /// Wallet owner the deposit address is labelled with.
    pub owner_id: UserId,
    /// Deposit address the funds arrived at.
    pub address: String,
    /// Asset the deposit was made in, e.g. "USDT".
    pub asset_type: String,
    /// Deposit amount in asset units.
    pub amount: Decimal,
    /// On-chain transaction hash.
    pub hash: String,
    /// True when the desk reports the deposit as final.
    pub settled: bool,
    /// Raw status string as reported by the desk, kept for logs.
    pub provider_status: String,
}

/// A deposit address provisioned at the custody desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositAddress {
    /// The on-chain address.
    pub address: String,
    /// Asset the address accepts.
    pub asset_type: String,
    /// Owner the address is labelled with.
    pub owner_id: UserId,
}

/// Port for the custody desk API.
///
/// The concrete vendor SDK is an adapter behind this trait; the reconciler
/// never sees the vendor's own response shapes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustodyClient: Send + Sync {
    /// Re-queries a deposit by its custody reference.
    ///
    /// # Errors
    ///
    /// Returns an error when the desk cannot be reached, rejects the
    /// request, or answers with a shape that cannot be decoded.
    async fn verify_transaction(&self, reference: &str) -> Result<VerifiedDeposit, CustodyError>;

    /// Provisions a new deposit address labelled with the owner's id.
    ///
    /// # Errors
    ///
    /// Returns an error when the desk cannot be reached or rejects the
    /// request.
    async fn create_address(
        &self,
        owner_id: UserId,
        asset_type: &str,
    ) -> Result<DepositAddress, CustodyError>;
}
