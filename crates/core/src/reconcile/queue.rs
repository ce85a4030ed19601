//! The serialization lane: a single-consumer FIFO for ledger mutations.
//!
//! Webhook handlers enqueue and return immediately; one worker drains the
//! lane one event at a time, so ledger mutations are never concurrent with
//! each other. The lane is in-memory only: events still queued when the
//! process stops are lost, and providers are expected to redeliver.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use super::event::TransferEvent;
use super::reconciler::Reconciler;

/// Errors raised when enqueuing onto the lane.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The worker has stopped; nothing will drain the lane again.
    #[error("Serialization lane is closed")]
    Closed,
}

/// Sender handle for the serialization lane.
///
/// Cheap to clone; every webhook handler holds one.
#[derive(Clone)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<TransferEvent>,
    depth: Arc<AtomicUsize>,
}

impl EventQueue {
    /// Appends an event to the tail of the lane. Never blocks.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] when the worker has shut down.
    pub fn enqueue(&self, event: TransferEvent) -> Result<(), QueueError> {
        // Counted before the send so the consumer's decrement can never
        // observe the counter at zero and wrap it.
        self.depth.fetch_add(1, Ordering::Relaxed);
        if self.tx.send(event).is_err() {
            self.depth.fetch_sub(1, Ordering::Relaxed);
            return Err(QueueError::Closed);
        }
        Ok(())
    }

    /// Number of events waiting in the lane.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }
}

/// Single consumer draining the lane.
pub struct ReconcileWorker {
    rx: mpsc::UnboundedReceiver<TransferEvent>,
    depth: Arc<AtomicUsize>,
    reconciler: Arc<Reconciler>,
    shutdown_rx: watch::Receiver<bool>,
}

impl ReconcileWorker {
    /// Creates the lane and its worker.
    ///
    /// # Arguments
    ///
    /// * `reconciler` - Applies each drained event to the ledger
    /// * `shutdown_rx` - Receiver for the shutdown signal
    #[must_use]
    pub fn new(
        reconciler: Arc<Reconciler>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> (EventQueue, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));
        let queue = EventQueue {
            tx,
            depth: Arc::clone(&depth),
        };
        let worker = Self {
            rx,
            depth,
            reconciler,
            shutdown_rx,
        };
        (queue, worker)
    }

    /// Runs until shutdown is signalled or every sender is dropped.
    ///
    /// A failure applying one event is logged and does not stop the drain;
    /// one bad event must not wedge the lane.
    pub async fn run(mut self) {
        info!("reconcile worker started");

        loop {
            tokio::select! {
                biased;

                changed = self.shutdown_rx.changed() => {
                    // A closed shutdown channel means the process is tearing down.
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!("reconcile worker received shutdown signal");
                        break;
                    }
                }

                event = self.rx.recv() => {
                    let Some(event) = event else {
                        info!("event channel closed");
                        break;
                    };

                    self.depth.fetch_sub(1, Ordering::Relaxed);
                    let kind = event.kind();
                    let reference = event.reference().to_string();

                    match self.reconciler.apply(event).await {
                        Ok(outcome) => {
                            info!(kind, reference = %reference, outcome = ?outcome, "event applied");
                        }
                        Err(err) => {
                            error!(kind, reference = %reference, error = %err, "event application failed");
                        }
                    }
                }
            }
        }

        info!("reconcile worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::MockCustodyClient;
    use crate::fx::{CurrencyConverter, MockRateFeed};
    use crate::reconcile::event::CryptoNotice;
    use crate::reconcile::store::MockLedgerStore;
    use chrono::Utc;

    fn reconciler() -> Arc<Reconciler> {
        Arc::new(Reconciler::new(
            Arc::new(MockLedgerStore::new()),
            Arc::new(MockCustodyClient::new()),
            Arc::new(CurrencyConverter::new(Arc::new(MockRateFeed::new()))),
        ))
    }

    fn incoming(reference: &str) -> TransferEvent {
        TransferEvent::CryptoIncoming(CryptoNotice {
            reference: reference.to_string(),
            occurred_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_depth_tracks_enqueue_and_drain() {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (queue, worker) = ReconcileWorker::new(reconciler(), shutdown_rx);

        queue.enqueue(incoming("a")).unwrap();
        queue.enqueue(incoming("b")).unwrap();
        assert_eq!(queue.depth(), 2);

        // Dropping every sender lets the worker drain and exit.
        let depth = Arc::clone(&queue.depth);
        drop(queue);
        worker.run().await;

        assert_eq!(depth.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_enqueue_after_worker_drop_fails() {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (queue, worker) = ReconcileWorker::new(reconciler(), shutdown_rx);
        drop(worker);

        let err = queue.enqueue(incoming("a")).unwrap_err();
        assert!(matches!(err, QueueError::Closed));
    }

    #[tokio::test]
    async fn test_shutdown_signal_stops_worker() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (_queue, worker) = ReconcileWorker::new(reconciler(), shutdown_rx);

        let handle = tokio::spawn(worker.run());
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
