//! Notification repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Notification;
use shared::models::NotificationStatus;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const NOTIFICATION_TABLE: &str = "notification";

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

    pub async fn create(&self, notification: Notification) -> RepoResult<Notification> {
        let created: Option<Notification> = self
            .base
            .db()
            .create(NOTIFICATION_TABLE)
            .content(notification)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Notification>> {
        let pure_id = strip_table_prefix(NOTIFICATION_TABLE, id);
        let n: Option<Notification> = self.base.db().select((NOTIFICATION_TABLE, pure_id)).await?;
        Ok(n)
    }

    /// Notifications addressed to one user, newest first. Expired
    /// entries are filtered out at read time.
    pub async fn list_for_user(&self, user_id: &str) -> RepoResult<Vec<Notification>> {
        let now = now_millis();
        let items: Vec<Notification> = self
            .base
            .db()
            .query(
                "SELECT * FROM notification \
                 WHERE user_id = $user_id \
                 AND (expires_at IS NONE OR expires_at > $now) \
                 ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Mark a notification read. Only the addressee may do this.
    pub async fn mark_read(&self, id: &str, user_id: &str) -> RepoResult<Notification> {
        let mut n = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("notification '{id}' not found")))?;
        if n.user_id != user_id {
            return Err(RepoError::NotFound(format!(
                "notification '{id}' not found"
            )));
        }
        if !n.is_read {
            n.is_read = true;
            n.read_at = Some(now_millis());
        }

        let rid = n
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("notification record without id".to_string()))?;
        let updated: Option<Notification> = self.base.db().update(rid).content(n).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update notification".to_string()))
    }

    /// Delete a notification. `acting_admin` lets an admin remove any
    /// row; everyone else may only remove their own.
    pub async fn delete(&self, id: &str, user_id: &str, acting_admin: bool) -> RepoResult<bool> {
        let existing = self.find_by_id(id).await?;
        match existing {
            Some(n) if acting_admin || n.user_id == user_id => {
                let pure_id = strip_table_prefix(NOTIFICATION_TABLE, id);
                let removed: Option<Notification> = self
                    .base
                    .db()
                    .delete((NOTIFICATION_TABLE, pure_id))
                    .await?;
                Ok(removed.is_some())
            }
            _ => Ok(false),
        }
    }

    /// Scheduled notifications whose dispatch time has passed.
    pub async fn find_due_scheduled(&self, now: i64) -> RepoResult<Vec<Notification>> {
        let items: Vec<Notification> = self
            .base
            .db()
            .query(
                "SELECT * FROM notification \
                 WHERE status = $status AND scheduled_at <= $now \
                 ORDER BY scheduled_at",
            )
            .bind(("status", NotificationStatus::Scheduled))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Record the outcome of an email dispatch attempt.
    pub async fn mark_dispatched(
        &self,
        id: &str,
        outcome: Result<String, String>,
    ) -> RepoResult<Notification> {
        let mut n = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("notification '{id}' not found")))?;

        match outcome {
            Ok(message_id) => {
                n.status = NotificationStatus::Sent;
                n.is_email_sent = true;
                n.email_sent_at = Some(now_millis());
                n.message_id = Some(message_id);
                n.error = None;
            }
            Err(reason) => {
                n.status = NotificationStatus::Failed;
                n.error = Some(reason);
            }
        }

        let rid = n
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("notification record without id".to_string()))?;
        let updated: Option<Notification> = self.base.db().update(rid).content(n).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update notification".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{NotificationPriority, NotificationType};

    async fn repo() -> NotificationRepository {
        let svc = DbService::memory().await.unwrap();
        NotificationRepository::new(svc.db)
    }

    fn make(user_id: &str, status: NotificationStatus, scheduled_at: Option<i64>) -> Notification {
        Notification {
            id: None,
            user_id: user_id.to_string(),
            kind: NotificationType::Info,
            priority: NotificationPriority::Normal,
            title: "Hello".to_string(),
            message: "World".to_string(),
            is_read: false,
            is_email_sent: false,
            email_sent_at: None,
            read_at: None,
            scheduled_at,
            expires_at: None,
            status,
            error: None,
            message_id: None,
            created_at: now_millis(),
        }
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_user() {
        let repo = repo().await;
        repo.create(make("user:a", NotificationStatus::Sent, None)).await.unwrap();
        repo.create(make("user:b", NotificationStatus::Sent, None)).await.unwrap();

        let for_a = repo.list_for_user("user:a").await.unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].user_id, "user:a");
    }

    #[tokio::test]
    async fn test_mark_read_rejects_other_user() {
        let repo = repo().await;
        let n = repo.create(make("user:a", NotificationStatus::Sent, None)).await.unwrap();
        let id = n.id.unwrap().key().to_string();

        let err = repo.mark_read(&id, "user:b").await;
        assert!(matches!(err, Err(RepoError::NotFound(_))));

        let read = repo.mark_read(&id, "user:a").await.unwrap();
        assert!(read.is_read);
        assert!(read.read_at.is_some());
    }

    #[tokio::test]
    async fn test_find_due_scheduled_honours_cutoff() {
        let repo = repo().await;
        let now = now_millis();
        repo.create(make("user:a", NotificationStatus::Scheduled, Some(now - 1_000)))
            .await
            .unwrap();
        repo.create(make("user:a", NotificationStatus::Scheduled, Some(now + 60_000)))
            .await
            .unwrap();
        repo.create(make("user:a", NotificationStatus::Sent, None)).await.unwrap();

        let due = repo.find_due_scheduled(now).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].scheduled_at, Some(now - 1_000));
    }

    #[tokio::test]
    async fn test_delete_scoped_to_owner_unless_admin() {
        let repo = repo().await;
        let n = repo.create(make("user:a", NotificationStatus::Sent, None)).await.unwrap();
        let id = n.id.unwrap().key().to_string();

        assert!(!repo.delete(&id, "user:b", false).await.unwrap());
        assert!(repo.delete(&id, "user:b", true).await.unwrap());
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_dispatched_records_outcome() {
        let repo = repo().await;
        let now = now_millis();
        let n = repo
            .create(make("user:a", NotificationStatus::Scheduled, Some(now)))
            .await
            .unwrap();
        let id = n.id.unwrap().key().to_string();

        let sent = repo
            .mark_dispatched(&id, Ok("msg-123".to_string()))
            .await
            .unwrap();
        assert_eq!(sent.status, NotificationStatus::Sent);
        assert!(sent.is_email_sent);
        assert_eq!(sent.message_id.as_deref(), Some("msg-123"));

        let failed = repo
            .mark_dispatched(&id, Err("smtp timeout".to_string()))
            .await
            .unwrap();
        assert_eq!(failed.status, NotificationStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("smtp timeout"));
    }
}
