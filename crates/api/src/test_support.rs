//! Shared stubs for route tests.
//!
//! Route tests exercise intake only: signature checks, payload parsing, and
//! enqueueing. The worker is constructed but never run, so the ports behind
//! the reconciler are inert stubs that no test is expected to reach.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::watch;

use kobo_core::custody::{CustodyClient, CustodyError, DepositAddress, VerifiedDeposit};
use kobo_core::fx::{CurrencyConverter, FxError, RateFeed, TradeSide};
use kobo_core::reconcile::{
    EventQueue, LedgerStore, LedgerTransaction, NewNotification, NewTransaction, ReconcileWorker,
    Reconciler, StoreError, TransferStatus,
};
use kobo_shared::config::WebhookConfig;
use kobo_shared::types::{Currency, UserId};

use crate::AppState;

pub const CUSTODY_SECRET: &str = "custody-test-secret";
pub const PROCESSOR_SECRET: &str = "processor-test-secret";

struct NullStore;

#[async_trait]
impl LedgerStore for NullStore {
    async fn find_transaction_by_reference(
        &self,
        _reference: &str,
    ) -> Result<Option<LedgerTransaction>, StoreError> {
        Ok(None)
    }

    async fn find_transaction_by_idempotency_key(
        &self,
        _key: &str,
    ) -> Result<Option<LedgerTransaction>, StoreError> {
        Ok(None)
    }

    async fn create_transaction(
        &self,
        _new: NewTransaction,
    ) -> Result<LedgerTransaction, StoreError> {
        Err(StoreError::Backend("ledger not wired in route tests".into()))
    }

    async fn update_transaction_status(
        &self,
        reference: &str,
        _status: TransferStatus,
    ) -> Result<(), StoreError> {
        Err(StoreError::TransactionNotFound(reference.to_string()))
    }

    async fn increment_wallet_balance(
        &self,
        user_id: UserId,
        _currency: Currency,
        _delta: Decimal,
    ) -> Result<(), StoreError> {
        Err(StoreError::WalletNotFound(user_id))
    }

    async fn decrement_wallet_balance(
        &self,
        user_id: UserId,
        _currency: Currency,
        _delta: Decimal,
    ) -> Result<(), StoreError> {
        Err(StoreError::WalletNotFound(user_id))
    }

    async fn count_notifications(&self, _reference: &str) -> Result<u64, StoreError> {
        Ok(0)
    }

    async fn create_notification(&self, _new: NewNotification) -> Result<(), StoreError> {
        Ok(())
    }
}

struct NullRates;

#[async_trait]
impl RateFeed for NullRates {
    async fn latest_rate(
        &self,
        _currency: Currency,
        _side: TradeSide,
    ) -> Result<Option<Decimal>, FxError> {
        Ok(None)
    }
}

struct NullCustody;

#[async_trait]
impl CustodyClient for NullCustody {
    async fn verify_transaction(&self, reference: &str) -> Result<VerifiedDeposit, CustodyError> {
        Err(CustodyError::Transport(format!(
            "no custody desk in route tests: {reference}"
        )))
    }

    async fn create_address(
        &self,
        _owner_id: UserId,
        _asset_type: &str,
    ) -> Result<DepositAddress, CustodyError> {
        Err(CustodyError::Transport(
            "no custody desk in route tests".into(),
        ))
    }
}

/// A live application state plus the handles keeping its lane open.
pub struct TestContext {
    pub state: AppState,
    pub queue: EventQueue,
    _worker: ReconcileWorker,
    _shutdown_tx: watch::Sender<bool>,
}

/// Builds an [`AppState`] whose queue stays open for the test's lifetime.
///
/// The worker is held but never spawned, so enqueued events stay countable
/// through [`EventQueue::depth`].
pub fn test_context() -> TestContext {
    let converter = Arc::new(CurrencyConverter::new(Arc::new(NullRates)));
    let reconciler = Arc::new(Reconciler::new(
        Arc::new(NullStore),
        Arc::new(NullCustody),
        converter,
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (queue, worker) = ReconcileWorker::new(reconciler, shutdown_rx);

    let state = AppState {
        queue: queue.clone(),
        webhooks: Arc::new(WebhookConfig {
            custody_secret: CUSTODY_SECRET.to_string(),
            processor_secret: PROCESSOR_SECRET.to_string(),
        }),
    };

    TestContext {
        state,
        queue,
        _worker: worker,
        _shutdown_tx: shutdown_tx,
    }
}
