//! Webhook-driven transaction reconciliation.
//!
//! Payment providers deliver webhooks concurrently, possibly duplicated and
//! out of order. This module normalizes them into [`TransferEvent`]s, feeds
//! them through a single-consumer serialization lane, and applies each one to
//! the ledger exactly once: fees are charged once, balances move once, and
//! redeliveries degrade into no-ops.

pub mod event;
pub mod notify;
pub mod queue;
pub mod reconciler;
pub mod status;
pub mod store;

pub use event::{CryptoNotice, TransferEvent, TransferNotice};
pub use notify::Notifier;
pub use queue::{EventQueue, QueueError, ReconcileWorker};
pub use reconciler::{synthesized_reference, Applied, ReconcileError, Reconciler};
pub use status::{TransferSource, TransferStatus, TransferType};
pub use store::{
    LedgerStore, LedgerTransaction, NewNotification, NewTransaction, StoreError, Wallet,
};

#[cfg(test)]
pub use store::MockLedgerStore;
