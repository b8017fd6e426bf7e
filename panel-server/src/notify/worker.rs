//! Scheduled notification worker

use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::util::now_millis;

use crate::db::repository::{NotificationRepository, UserRepository};
use crate::notify::Mailer;
use crate::utils::AppResult;

/// Polls for scheduled notifications whose dispatch time has passed and
/// sends them through the mailer.
///
/// Each row carries its own outcome; a failed send is marked failed and
/// not retried on later passes. A recipient deactivated between
/// scheduling and dispatch is marked failed rather than emailed.
pub struct ScheduleWorker {
    notifications: NotificationRepository,
    users: UserRepository,
    mailer: Arc<dyn Mailer>,
    poll_interval: Duration,
}

impl ScheduleWorker {
    pub fn new(db: Surreal<Db>, mailer: Arc<dyn Mailer>, poll_secs: u64) -> Self {
        Self {
            notifications: NotificationRepository::new(db.clone()),
            users: UserRepository::new(db),
            mailer,
            poll_interval: Duration::from_secs(poll_secs),
        }
    }

    /// Run the polling loop until the process shuts down.
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.poll_interval.as_secs(),
            "Schedule worker started"
        );
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match self.process_due(now_millis()).await {
                Ok(0) => {}
                Ok(n) => tracing::info!(count = n, "Dispatched due scheduled notifications"),
                Err(e) => tracing::error!(error = %e, "Schedule worker pass failed"),
            }
        }
    }

    /// One polling pass: dispatch everything due at `now`. Returns the
    /// number of rows processed.
    pub async fn process_due(&self, now: i64) -> AppResult<u32> {
        let due = self.notifications.find_due_scheduled(now).await?;
        let mut processed = 0u32;

        for notification in due {
            let Some(id) = notification.id.as_ref().map(|r| r.key().to_string()) else {
                continue;
            };

            let outcome = match self.users.find_by_id(&notification.user_id).await? {
                Some(user) if user.is_active => self
                    .mailer
                    .send(
                        &user.email,
                        &notification.title,
                        &notification.message,
                        notification.priority,
                    )
                    .await
                    .map(|sent| sent.message_id)
                    .map_err(|e| e.to_string()),
                Some(_) => Err("recipient account deactivated".to_string()),
                None => Err("recipient account deleted".to_string()),
            };

            self.notifications.mark_dispatched(&id, outcome).await?;
            processed += 1;
        }
        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{Notification, UserCreate, UserUpdate};
    use crate::notify::{MailError, SentEmail};
    use async_trait::async_trait;
    use shared::models::{
        NotificationPriority, NotificationStatus, NotificationType, Role,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        deliveries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(
            &self,
            to: &str,
            _subject: &str,
            _body: &str,
            _priority: NotificationPriority,
        ) -> Result<SentEmail, MailError> {
            self.deliveries.lock().unwrap().push(to.to_string());
            Ok(SentEmail {
                message_id: "msg-1".to_string(),
                timestamp: now_millis(),
            })
        }
    }

    async fn seed_scheduled(
        repo: &NotificationRepository,
        user_id: &str,
        scheduled_at: i64,
    ) -> String {
        let n = repo
            .create(Notification {
                id: None,
                user_id: user_id.to_string(),
                kind: NotificationType::Info,
                priority: NotificationPriority::Normal,
                title: "Reminder".to_string(),
                message: "Due".to_string(),
                is_read: false,
                is_email_sent: false,
                email_sent_at: None,
                read_at: None,
                scheduled_at: Some(scheduled_at),
                expires_at: None,
                status: NotificationStatus::Scheduled,
                error: None,
                message_id: None,
                created_at: now_millis(),
            })
            .await
            .unwrap();
        n.id.unwrap().key().to_string()
    }

    #[tokio::test]
    async fn test_dispatches_only_due_rows() {
        let svc = DbService::memory().await.unwrap();
        let users = UserRepository::new(svc.db.clone());
        let notifications = NotificationRepository::new(svc.db.clone());
        let mailer = Arc::new(RecordingMailer::default());
        let worker = ScheduleWorker::new(svc.db.clone(), mailer.clone(), 60);

        let ada = users
            .create(UserCreate {
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
                password: "password123".to_string(),
                role: Role::Employee,
            })
            .await
            .unwrap();
        let ada_id = ada.id.unwrap().key().to_string();

        let now = now_millis();
        let due_id = seed_scheduled(&notifications, &ada_id, now - 1_000).await;
        seed_scheduled(&notifications, &ada_id, now + 3_600_000).await;

        let processed = worker.process_due(now).await.unwrap();
        assert_eq!(processed, 1);
        assert_eq!(mailer.deliveries.lock().unwrap().as_slice(), ["ada@example.com"]);

        let sent = notifications.find_by_id(&due_id).await.unwrap().unwrap();
        assert_eq!(sent.status, NotificationStatus::Sent);
        assert!(sent.is_email_sent);

        // second pass finds nothing left to do
        assert_eq!(worker.process_due(now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deactivated_recipient_is_marked_failed() {
        let svc = DbService::memory().await.unwrap();
        let users = UserRepository::new(svc.db.clone());
        let notifications = NotificationRepository::new(svc.db.clone());
        let mailer = Arc::new(RecordingMailer::default());
        let worker = ScheduleWorker::new(svc.db.clone(), mailer.clone(), 60);

        let bob = users
            .create(UserCreate {
                email: "bob@example.com".to_string(),
                name: "Bob".to_string(),
                password: "password123".to_string(),
                role: Role::Employee,
            })
            .await
            .unwrap();
        let bob_id = bob.id.unwrap().key().to_string();
        users
            .update(
                &bob_id,
                UserUpdate {
                    email: None,
                    name: None,
                    password: None,
                    role: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();

        let now = now_millis();
        let id = seed_scheduled(&notifications, &bob_id, now - 1_000).await;

        assert_eq!(worker.process_due(now).await.unwrap(), 1);
        assert!(mailer.deliveries.lock().unwrap().is_empty());

        let row = notifications.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(row.status, NotificationStatus::Failed);
        assert!(row.error.is_some());
    }
}
