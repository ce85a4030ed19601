//! User-facing notifications with a per-reference cap.

use std::sync::Arc;

use tracing::debug;

use kobo_shared::types::UserId;

use super::store::{LedgerStore, NewNotification, StoreError};

/// Most notifications that may share one reference.
///
/// Retried webhook deliveries are allowed to produce a second notice, but
/// never a third. At-most-twice, not at-most-once.
const MAX_PER_REFERENCE: u64 = 2;

/// Records user-facing notices, bounded per transaction reference.
pub struct Notifier {
    store: Arc<dyn LedgerStore>,
}

impl Notifier {
    /// Creates a notifier backed by the given store.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Records a notification unless the reference already carries two.
    ///
    /// Returns `true` when a notification was written.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the cap check itself never fails.
    pub async fn notify(
        &self,
        title: &str,
        description: &str,
        user_id: UserId,
        reference: &str,
    ) -> Result<bool, StoreError> {
        let existing = self.store.count_notifications(reference).await?;
        if existing >= MAX_PER_REFERENCE {
            debug!(reference = %reference, existing, "notification cap reached, skipping");
            return Ok(false);
        }

        self.store
            .create_notification(NewNotification {
                title: title.to_string(),
                description: description.to_string(),
                reference: reference.to_string(),
                user_id,
            })
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::store::MockLedgerStore;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_notify_records_below_cap() {
        let mut store = MockLedgerStore::new();
        store
            .expect_count_notifications()
            .with(eq("tr-1"))
            .returning(|_| Ok(1));
        store
            .expect_create_notification()
            .withf(|new| new.reference == "tr-1" && new.title == "Transfer successful")
            .times(1)
            .returning(|_| Ok(()));

        let notifier = Notifier::new(Arc::new(store));
        let written = notifier
            .notify("Transfer successful", "details", UserId::new(), "tr-1")
            .await
            .unwrap();

        assert!(written);
    }

    #[tokio::test]
    async fn test_notify_skips_at_cap() {
        let mut store = MockLedgerStore::new();
        store
            .expect_count_notifications()
            .with(eq("tr-1"))
            .returning(|_| Ok(2));
        store.expect_create_notification().times(0);

        let notifier = Notifier::new(Arc::new(store));
        let written = notifier
            .notify("Transfer successful", "details", UserId::new(), "tr-1")
            .await
            .unwrap();

        assert!(!written);
    }
}
