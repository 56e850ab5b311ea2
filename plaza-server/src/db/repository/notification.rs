//! Notification Repository

use super::{BaseRepository, RepoError, RepoResult, record_id, record_ref};
use crate::db::models::Notification;
use shared::NotificationStatus;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "notification";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// A user's notifications, newest first
    pub async fn find_by_recipient(&self, user_id: &str) -> RepoResult<Vec<Notification>> {
        let notifications: Vec<Notification> = self
            .base
            .db()
            .query(
                "SELECT * FROM notification WHERE recipient = $recipient \
                 ORDER BY created_at DESC LIMIT 200",
            )
            .bind(("recipient", record_ref("user", user_id)))
            .await?
            .take(0)?;
        Ok(notifications)
    }

    /// Find notification by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Notification>> {
        let notification: Option<Notification> =
            self.base.db().select(record_id(TABLE, id)).await?;
        Ok(notification)
    }

    /// Persist a new (pending) notification
    pub async fn create(&self, notification: Notification) -> RepoResult<Notification> {
        let created: Option<Notification> =
            self.base.db().create(TABLE).content(notification).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    /// Mark a notification read (scoped to its recipient)
    pub async fn mark_read(&self, id: &str, user_id: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $notification SET is_read = true \
                 WHERE recipient = $recipient RETURN AFTER",
            )
            .bind(("notification", record_id(TABLE, id)))
            .bind(("recipient", record_ref("user", user_id)))
            .await?;
        let updated: Vec<Notification> = result.take(0)?;
        Ok(!updated.is_empty())
    }

    /// Record delivery outcome from the dispatch worker
    pub async fn set_delivery_status(
        &self,
        id: &str,
        status: NotificationStatus,
        error: Option<String>,
    ) -> RepoResult<()> {
        let sent_at = matches!(status, NotificationStatus::Sent).then(now_millis);
        self.base
            .db()
            .query(
                "UPDATE $notification SET \
                    status = $status, \
                    sent_at = $sent_at OR sent_at, \
                    error = $error",
            )
            .bind(("notification", record_id(TABLE, id)))
            .bind(("status", status))
            .bind(("sent_at", sent_at))
            .bind(("error", error))
            .await?;
        Ok(())
    }
}
