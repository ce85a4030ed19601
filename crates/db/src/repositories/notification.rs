//! Notification repository for user-facing settlement notices.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use kobo_core::reconcile::NewNotification;
use kobo_shared::types::NotificationId;

use crate::entities::notifications;

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a notification row. New notices start unread.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert(&self, new: &NewNotification) -> Result<notifications::Model, DbErr> {
        let notification = notifications::ActiveModel {
            id: Set(NotificationId::new().into_inner()),
            user_id: Set(new.user_id.into_inner()),
            title: Set(new.title.clone()),
            description: Set(new.description.clone()),
            reference: Set(new.reference.clone()),
            read: Set(false),
            created_at: Set(Utc::now().into()),
        };

        notification.insert(&self.db).await
    }

    /// Counts the notifications already issued for a transaction reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_for_reference(&self, reference: &str) -> Result<u64, DbErr> {
        notifications::Entity::find()
            .filter(notifications::Column::Reference.eq(reference))
            .count(&self.db)
            .await
    }
}
