//! The reconciler: classifies normalized events and drives the state machine.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use kobo_shared::types::{Currency, UserId};

use crate::custody::{CustodyClient, CustodyError};
use crate::fees::FeeCalculator;
use crate::fx::{ConversionDirection, CurrencyConverter, FxError};

use super::event::{TransferEvent, TransferNotice};
use super::notify::Notifier;
use super::status::{TransferSource, TransferStatus, TransferType};
use super::store::{LedgerStore, LedgerTransaction, NewTransaction, StoreError};

/// Errors that can occur while applying one event.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A transfer event named a reference with no matching transaction.
    ///
    /// The withdrawal was never recorded on our side. Nothing is mutated,
    /// but the drop is loud: this is an anomaly worth alerting on, not
    /// routine traffic.
    #[error("No transaction matches reference {reference}")]
    UnknownReference {
        /// The reference the processor sent.
        reference: String,
    },

    /// The custody desk does not report the deposit as final.
    #[error("Deposit {reference} is not settled at the desk: {status}")]
    Unverified {
        /// Custody-side reference.
        reference: String,
        /// Raw status the desk reported.
        status: String,
    },

    /// Persistence failed while applying the event.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// A conversion rate was required but unavailable.
    #[error("Conversion error: {0}")]
    Fx(#[from] FxError),

    /// The custody desk could not be queried.
    #[error("Custody error: {0}")]
    Custody(#[from] CustodyError),
}

/// What applying one event did to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Event acknowledged; nothing to mutate.
    Acknowledged,
    /// A verified deposit was settled and credited.
    DepositSettled,
    /// A transfer's reported outcome was recorded.
    StatusRecorded,
    /// A failed or reversed transfer was re-credited.
    Reversed,
    /// Idempotency guard matched; nothing was re-applied.
    Duplicate,
}

/// Builds the reference for the naira credit derived from a crypto deposit.
#[must_use]
pub fn synthesized_reference(owner_id: UserId, idempotency_key: &str) -> String {
    format!("crypto-transfer-{owner_id}-{idempotency_key}")
}

/// Applies normalized webhook events to the ledger.
///
/// One instance serves the whole process; the serialization lane guarantees
/// `apply` never runs concurrently with itself, so the explicit existence
/// checks here are ordinarily decisive and the store's unique constraints
/// only matter if that guarantee is ever relaxed.
pub struct Reconciler {
    store: Arc<dyn LedgerStore>,
    custody: Arc<dyn CustodyClient>,
    converter: Arc<CurrencyConverter>,
    notifier: Notifier,
}

impl Reconciler {
    /// Creates a reconciler over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn LedgerStore>,
        custody: Arc<dyn CustodyClient>,
        converter: Arc<CurrencyConverter>,
    ) -> Self {
        let notifier = Notifier::new(Arc::clone(&store));
        Self {
            store,
            custody,
            converter,
            notifier,
        }
    }

    /// Applies one event to the ledger.
    ///
    /// # Errors
    ///
    /// Failures are scoped to this one event; the worker logs them and
    /// moves on to the next event in the lane.
    pub async fn apply(&self, event: TransferEvent) -> Result<Applied, ReconcileError> {
        match event {
            TransferEvent::CryptoIncoming(notice) => {
                info!(reference = %notice.reference, "incoming crypto transfer observed");
                Ok(Applied::Acknowledged)
            }
            TransferEvent::CryptoDepositCreated(notice) => {
                self.settle_crypto_deposit(&notice.reference).await
            }
            TransferEvent::TransferSucceeded(notice) => {
                self.record_transfer_success(&notice).await
            }
            TransferEvent::TransferFailed(notice) => {
                self.reverse_transfer(&notice, TransferStatus::Failed).await
            }
            TransferEvent::TransferReversed(notice) => {
                self.reverse_transfer(&notice, TransferStatus::Reversed)
                    .await
            }
        }
    }

    /// Verifies a deposit against the custody desk and settles it as naira.
    ///
    /// The pending record is written before the finality check so an
    /// unsettled deposit is visible in the ledger instead of invisible
    /// until the desk confirms. Two guards make redelivery safe: the
    /// deposit record is keyed by the provider's idempotency key, and the
    /// naira credit is keyed by its synthesized reference. Either existing
    /// means that part has already been done and is skipped; the fee is
    /// therefore charged at most once.
    async fn settle_crypto_deposit(&self, reference: &str) -> Result<Applied, ReconcileError> {
        let deposit = self.custody.verify_transaction(reference).await?;

        let recorded = self
            .store
            .find_transaction_by_idempotency_key(&deposit.idempotency_key)
            .await?;
        let already_completed = recorded
            .as_ref()
            .is_some_and(|tx| tx.status == TransferStatus::Completed);

        if recorded.is_none() {
            let record = NewTransaction {
                reference: deposit.reference.clone(),
                idempotency_key: Some(deposit.idempotency_key.clone()),
                user_id: deposit.owner_id,
                source: TransferSource::Crypto,
                transfer_type: TransferType::Deposit,
                status: TransferStatus::Pending,
                amount: deposit.amount,
                settlement_amount: deposit.amount,
                total_fee: Decimal::ZERO,
                processing_fee: Decimal::ZERO,
                dollar_rate: None,
                currency: Currency::Usd,
            };
            match self.store.create_transaction(record).await {
                // The unique key is the backstop against a racing writer.
                Ok(_) | Err(StoreError::Duplicate(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        if !deposit.settled {
            return Err(ReconcileError::Unverified {
                reference: reference.to_string(),
                status: deposit.provider_status,
            });
        }

        let credit_reference = synthesized_reference(deposit.owner_id, &deposit.idempotency_key);
        let mut outcome = Applied::Duplicate;

        if self
            .store
            .find_transaction_by_reference(&credit_reference)
            .await?
            .is_none()
        {
            let quote = self
                .converter
                .convert(deposit.amount, ConversionDirection::UsdToNgn)
                .await?;
            let fees = FeeCalculator::conversion_fees(quote.price);
            let settlement = quote.price - fees.total_fee;

            let credit = NewTransaction {
                reference: credit_reference.clone(),
                idempotency_key: None,
                user_id: deposit.owner_id,
                source: TransferSource::Crypto,
                transfer_type: TransferType::Conversion,
                status: TransferStatus::Completed,
                amount: quote.price,
                settlement_amount: settlement,
                total_fee: fees.total_fee,
                processing_fee: fees.processing_fee,
                dollar_rate: Some(quote.rate),
                currency: Currency::Ngn,
            };

            match self.store.create_transaction(credit).await {
                Ok(_) => {
                    self.store
                        .increment_wallet_balance(deposit.owner_id, Currency::Ngn, settlement)
                        .await?;
                    self.notifier
                        .notify(
                            "Deposit settled",
                            &format!(
                                "Your deposit of {} {} has been settled as {} NGN",
                                deposit.amount, deposit.asset_type, settlement
                            ),
                            deposit.owner_id,
                            &credit_reference,
                        )
                        .await?;
                    outcome = Applied::DepositSettled;
                }
                Err(StoreError::Duplicate(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        if !already_completed {
            self.store
                .update_transaction_status(&deposit.reference, TransferStatus::Completed)
                .await?;
        }

        Ok(outcome)
    }

    /// Records a processor-reported success.
    ///
    /// Never touches fees or balances: for a disbursement those were
    /// settled when the transfer was requested. Redeliveries may produce
    /// a second notification; the cap stops a third.
    async fn record_transfer_success(
        &self,
        notice: &TransferNotice,
    ) -> Result<Applied, ReconcileError> {
        let tx = self.find_by_reference(&notice.reference).await?;

        debug!(
            reference = %tx.reference,
            provider_status = %notice.raw_status,
            "processor reports success"
        );

        let already_recorded = !tx.status.can_transition_to(TransferStatus::Success);
        if !already_recorded {
            self.store
                .update_transaction_status(&tx.reference, TransferStatus::Success)
                .await?;
        }

        self.notifier
            .notify(
                "Transfer successful",
                &format!(
                    "Your transfer of {} {} was successful",
                    tx.amount, tx.currency
                ),
                tx.user_id,
                &tx.reference,
            )
            .await?;

        Ok(if already_recorded {
            Applied::Duplicate
        } else {
            Applied::StatusRecorded
        })
    }

    /// Marks a transfer failed or reversed and returns the debit.
    ///
    /// The refund is the stored amount plus the stored total fee; webhook
    /// amounts are not trusted for money movement. The terminal state is
    /// recorded before the credit so a redelivery cannot credit twice.
    async fn reverse_transfer(
        &self,
        notice: &TransferNotice,
        to_status: TransferStatus,
    ) -> Result<Applied, ReconcileError> {
        let tx = self.find_by_reference(&notice.reference).await?;

        if !tx.status.can_transition_to(to_status) {
            return Ok(Applied::Duplicate);
        }

        self.store
            .update_transaction_status(&tx.reference, to_status)
            .await?;

        let refund = tx.amount + tx.total_fee;
        self.store
            .increment_wallet_balance(tx.user_id, tx.currency, refund)
            .await?;

        let (title, description) = if to_status == TransferStatus::Reversed {
            (
                "Transfer reversed",
                format!(
                    "Your transfer of {} {} was reversed. {} {} has been returned to your wallet",
                    tx.amount, tx.currency, refund, tx.currency
                ),
            )
        } else {
            (
                "Transfer failed",
                format!(
                    "Your transfer of {} {} could not be completed. {} {} has been returned to your wallet",
                    tx.amount, tx.currency, refund, tx.currency
                ),
            )
        };
        self.notifier
            .notify(title, &description, tx.user_id, &tx.reference)
            .await?;

        Ok(Applied::Reversed)
    }

    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<LedgerTransaction, ReconcileError> {
        self.store
            .find_transaction_by_reference(reference)
            .await?
            .ok_or_else(|| ReconcileError::UnknownReference {
                reference: reference.to_string(),
            })
    }
}
