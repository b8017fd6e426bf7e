//! Notification fan-out dispatcher

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

use shared::models::{NotificationStatus, SendType};
use shared::util::now_millis;

use crate::db::models::{Notification, NotificationCreate, User};
use crate::db::repository::{NotificationRepository, UserRepository};
use crate::notify::{Mailer, render};
use crate::utils::{AppError, AppResult, validation_error_map};

/// Outcome for one recipient of a batch
#[derive(Debug, Clone, Serialize)]
pub struct RecipientResult {
    pub email: String,
    pub status: NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate outcome of one dispatch call
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub sent: u32,
    pub scheduled: u32,
    pub failed: u32,
    pub results: Vec<RecipientResult>,
}

/// Fans one message out to many recipients.
///
/// Recipients are resolved to active user accounts; addresses without a
/// matching active account are dropped from the batch without error.
/// Deliveries run sequentially and one failed recipient never aborts
/// the rest; each failure is recorded on its own notification row.
/// There is no retry, a failed send stays failed until an operator
/// re-dispatches.
#[derive(Clone)]
pub struct NotificationDispatcher {
    users: UserRepository,
    notifications: NotificationRepository,
    mailer: Arc<dyn Mailer>,
}

impl NotificationDispatcher {
    pub fn new(db: Surreal<Db>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            notifications: NotificationRepository::new(db),
            mailer,
        }
    }

    pub async fn dispatch(&self, data: NotificationCreate) -> AppResult<BatchSummary> {
        if let Err(errors) = data.validate() {
            return Err(AppError::validation_fields(validation_error_map(&errors)));
        }
        if data.send_type == SendType::Scheduled && data.scheduled_at.is_none() {
            let mut map = HashMap::new();
            map.insert(
                "scheduled_at".to_string(),
                "scheduled send requires a dispatch time".to_string(),
            );
            return Err(AppError::validation_fields(map));
        }

        let recipients = self.users.find_active_by_emails(&data.recipients).await?;
        let dropped = data.recipients.len() - recipients.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped recipients without an active account");
        }

        let mut summary = BatchSummary {
            sent: 0,
            scheduled: 0,
            failed: 0,
            results: Vec::with_capacity(recipients.len()),
        };

        for user in recipients {
            let outcome = match data.send_type {
                SendType::Immediate => self.send_now(&data, &user).await,
                SendType::Scheduled => self.schedule(&data, &user).await,
            };
            // store-level failure for one recipient never aborts the rest
            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(email = %user.email, error = %e, "Recipient processing failed");
                    RecipientResult {
                        email: user.email.clone(),
                        status: NotificationStatus::Failed,
                        message_id: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            match result.status {
                NotificationStatus::Sent => summary.sent += 1,
                NotificationStatus::Scheduled => summary.scheduled += 1,
                NotificationStatus::Failed => summary.failed += 1,
            }
            summary.results.push(result);
        }

        tracing::info!(
            sent = summary.sent,
            scheduled = summary.scheduled,
            failed = summary.failed,
            "Notification batch dispatched"
        );
        Ok(summary)
    }

    async fn send_now(&self, data: &NotificationCreate, user: &User) -> AppResult<RecipientResult> {
        let (title, message) = personalize(data, user);

        let outcome = self
            .mailer
            .send(&user.email, &title, &message, data.priority)
            .await;

        let now = now_millis();
        let (status, message_id, error) = match outcome {
            Ok(sent) => (NotificationStatus::Sent, Some(sent.message_id), None),
            Err(e) => {
                tracing::warn!(email = %user.email, error = %e, "Notification delivery failed");
                (NotificationStatus::Failed, None, Some(e.to_string()))
            }
        };

        self.notifications
            .create(Notification {
                id: None,
                user_id: user_key(user),
                kind: data.kind,
                priority: data.priority,
                title,
                message,
                is_read: false,
                is_email_sent: status == NotificationStatus::Sent,
                email_sent_at: (status == NotificationStatus::Sent).then_some(now),
                read_at: None,
                scheduled_at: None,
                expires_at: data.expires_at,
                status,
                error: error.clone(),
                message_id: message_id.clone(),
                created_at: now,
            })
            .await?;

        Ok(RecipientResult {
            email: user.email.clone(),
            status,
            message_id,
            error,
        })
    }

    async fn schedule(&self, data: &NotificationCreate, user: &User) -> AppResult<RecipientResult> {
        let (title, message) = personalize(data, user);

        self.notifications
            .create(Notification {
                id: None,
                user_id: user_key(user),
                kind: data.kind,
                priority: data.priority,
                title,
                message,
                is_read: false,
                is_email_sent: false,
                email_sent_at: None,
                read_at: None,
                scheduled_at: data.scheduled_at,
                expires_at: data.expires_at,
                status: NotificationStatus::Scheduled,
                error: None,
                message_id: None,
                created_at: now_millis(),
            })
            .await?;

        Ok(RecipientResult {
            email: user.email.clone(),
            status: NotificationStatus::Scheduled,
            message_id: None,
            error: None,
        })
    }
}

fn user_key(user: &User) -> String {
    user.id
        .as_ref()
        .map(|r| r.key().to_string())
        .unwrap_or_default()
}

/// Fixed sample values for the business placeholders until per-customer
/// analytics exist.
const SAMPLE_COMPANY: &str = "SP Commerce";
const SAMPLE_ORDER_COUNT: &str = "12";
const SAMPLE_TOTAL_SPEND: &str = "4850.00";

fn personalize(data: &NotificationCreate, user: &User) -> (String, String) {
    let mut vars = HashMap::new();
    vars.insert("name".to_string(), user.name.clone());
    vars.insert("email".to_string(), user.email.clone());
    vars.insert("role".to_string(), user.role.as_str().to_string());
    vars.insert("company".to_string(), SAMPLE_COMPANY.to_string());
    vars.insert("order_count".to_string(), SAMPLE_ORDER_COUNT.to_string());
    vars.insert("total_spend".to_string(), SAMPLE_TOTAL_SPEND.to_string());
    (render(&data.title, &vars), render(&data.message, &vars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::UserCreate;
    use crate::notify::{MailError, SentEmail};
    use async_trait::async_trait;
    use shared::models::{NotificationPriority, NotificationType, Role};
    use std::sync::Mutex;

    /// Always succeeds; records every delivery.
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
                message_id: format!("msg-{to}"),
                timestamp: now_millis(),
            })
        }
    }

    /// Fails for one specific address, succeeds for everyone else.
    struct FlakyMailer {
        fail_for: String,
    }

    #[async_trait]
    impl Mailer for FlakyMailer {
        async fn send(
            &self,
            to: &str,
            _subject: &str,
            _body: &str,
            _priority: NotificationPriority,
        ) -> Result<SentEmail, MailError> {
            if to == self.fail_for {
                Err(MailError::Delivery("mailbox unavailable".to_string()))
            } else {
                Ok(SentEmail {
                    message_id: format!("msg-{to}"),
                    timestamp: now_millis(),
                })
            }
        }
    }

    async fn setup(mailer: Arc<dyn Mailer>) -> (NotificationDispatcher, UserRepository, NotificationRepository) {
        let svc = DbService::memory().await.unwrap();
        let dispatcher = NotificationDispatcher::new(svc.db.clone(), mailer);
        (
            dispatcher,
            UserRepository::new(svc.db.clone()),
            NotificationRepository::new(svc.db),
        )
    }

    async fn seed_user(users: &UserRepository, email: &str, active: bool) -> User {
        let u = users
            .create(UserCreate {
                email: email.to_string(),
                name: email.split('@').next().unwrap().to_string(),
                password: "password123".to_string(),
                role: Role::Employee,
            })
            .await
            .unwrap();
        if !active {
            let id = u.id.clone().unwrap().key().to_string();
            return users
                .update(
                    &id,
                    crate::db::models::UserUpdate {
                        email: None,
                        name: None,
                        password: None,
                        role: None,
                        is_active: Some(false),
                    },
                )
                .await
                .unwrap();
        }
        u
    }

    fn batch(recipients: Vec<&str>, send_type: SendType, scheduled_at: Option<i64>) -> NotificationCreate {
        NotificationCreate {
            recipients: recipients.into_iter().map(String::from).collect(),
            title: "Hi {{name}}".to_string(),
            message: "Your account {{email}} has news.".to_string(),
            kind: NotificationType::Info,
            priority: NotificationPriority::Normal,
            send_type,
            scheduled_at,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_and_inactive_recipients_are_dropped() {
        let mailer = Arc::new(RecordingMailer::default());
        let (dispatcher, users, _) = setup(mailer.clone()).await;
        for i in 0..5 {
            seed_user(&users, &format!("u{i}@example.com"), true).await;
        }
        seed_user(&users, "inactive@example.com", false).await;

        let mut recipients: Vec<String> = (0..5).map(|i| format!("u{i}@example.com")).collect();
        recipients.push("inactive@example.com".to_string());
        recipients.push("ghost@example.com".to_string());

        let summary = dispatcher
            .dispatch(NotificationCreate {
                recipients,
                ..batch(vec![], SendType::Immediate, None)
            })
            .await
            .unwrap();

        assert_eq!(summary.results.len(), 5);
        assert_eq!(summary.sent, 5);
        assert_eq!(summary.failed, 0);
        assert_eq!(mailer.deliveries.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_the_batch() {
        let mailer = Arc::new(FlakyMailer {
            fail_for: "u1@example.com".to_string(),
        });
        let (dispatcher, users, notifications) = setup(mailer).await;
        let mut seeded = Vec::new();
        for i in 0..3 {
            seeded.push(seed_user(&users, &format!("u{i}@example.com"), true).await);
        }

        let summary = dispatcher
            .dispatch(batch(
                vec!["u0@example.com", "u1@example.com", "u2@example.com"],
                SendType::Immediate,
                None,
            ))
            .await
            .unwrap();

        assert_eq!(summary.sent, 2);
        assert_eq!(summary.failed, 1);
        let failed = summary
            .results
            .iter()
            .find(|r| r.status == NotificationStatus::Failed)
            .unwrap();
        assert_eq!(failed.email, "u1@example.com");
        assert!(failed.error.is_some());

        // the failed recipient still gets a persisted notification row
        let u1 = seeded.iter().find(|u| u.email == "u1@example.com").unwrap();
        let rows = notifications
            .list_for_user(&u1.id.as_ref().unwrap().key().to_string())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, NotificationStatus::Failed);
    }

    #[tokio::test]
    async fn test_scheduled_batch_persists_without_sending() {
        let mailer = Arc::new(RecordingMailer::default());
        let (dispatcher, users, notifications) = setup(mailer.clone()).await;
        let ada = seed_user(&users, "ada@example.com", true).await;

        let when = now_millis() + 3_600_000;
        let summary = dispatcher
            .dispatch(batch(vec!["ada@example.com"], SendType::Scheduled, Some(when)))
            .await
            .unwrap();

        assert_eq!(summary.scheduled, 1);
        assert_eq!(summary.sent, 0);
        assert!(mailer.deliveries.lock().unwrap().is_empty());

        let rows = notifications
            .list_for_user(&ada.id.as_ref().unwrap().key().to_string())
            .await
            .unwrap();
        assert_eq!(rows[0].status, NotificationStatus::Scheduled);
        assert_eq!(rows[0].scheduled_at, Some(when));
    }

    #[tokio::test]
    async fn test_scheduled_without_time_is_rejected() {
        let mailer = Arc::new(RecordingMailer::default());
        let (dispatcher, users, _) = setup(mailer).await;
        seed_user(&users, "ada@example.com", true).await;

        let err = dispatcher
            .dispatch(batch(vec!["ada@example.com"], SendType::Scheduled, None))
            .await
            .unwrap_err();
        match err {
            AppError::ValidationFields(map) => assert!(map.contains_key("scheduled_at")),
            other => panic!("expected field validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_business_placeholders_get_sample_values() {
        let mailer = Arc::new(RecordingMailer::default());
        let (dispatcher, users, notifications) = setup(mailer).await;
        let ada = seed_user(&users, "ada@example.com", true).await;

        let welcome = crate::notify::canned_templates()
            .iter()
            .find(|t| t.id == "welcome")
            .unwrap();
        dispatcher
            .dispatch(NotificationCreate {
                title: welcome.subject.to_string(),
                message: format!(
                    "{}\nYou placed {{{{order_count}}}} orders worth {{{{total_spend}}}}.",
                    welcome.body
                ),
                ..batch(vec!["ada@example.com"], SendType::Immediate, None)
            })
            .await
            .unwrap();

        let rows = notifications
            .list_for_user(&ada.id.as_ref().unwrap().key().to_string())
            .await
            .unwrap();
        assert_eq!(rows[0].title, format!("Welcome to {SAMPLE_COMPANY}"));
        assert!(rows[0].message.contains(SAMPLE_ORDER_COUNT));
        assert!(rows[0].message.contains(SAMPLE_TOTAL_SPEND));
        assert!(!rows[0].message.contains("{{"), "{}", rows[0].message);
    }

    #[tokio::test]
    async fn test_store_failure_does_not_abort_the_batch() {
        let svc = DbService::memory().await.unwrap();
        // reject long personalized titles so only one recipient's row persists
        svc.db
            .query("DEFINE FIELD title ON TABLE notification ASSERT string::len($value) < 8;")
            .await
            .unwrap();
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = NotificationDispatcher::new(svc.db.clone(), mailer);
        let users = UserRepository::new(svc.db);
        seed_user(&users, "bo@example.com", true).await;
        seed_user(&users, "marianne@example.com", true).await;

        let summary = dispatcher
            .dispatch(batch(
                vec!["bo@example.com", "marianne@example.com"],
                SendType::Immediate,
                None,
            ))
            .await
            .unwrap();

        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 1);
        let failed = summary
            .results
            .iter()
            .find(|r| r.status == NotificationStatus::Failed)
            .unwrap();
        assert_eq!(failed.email, "marianne@example.com");
        assert!(failed.error.is_some());
    }

    #[tokio::test]
    async fn test_titles_are_personalized() {
        let mailer = Arc::new(RecordingMailer::default());
        let (dispatcher, users, notifications) = setup(mailer).await;
        let ada = seed_user(&users, "ada@example.com", true).await;

        dispatcher
            .dispatch(batch(vec!["ada@example.com"], SendType::Immediate, None))
            .await
            .unwrap();

        let rows = notifications
            .list_for_user(&ada.id.as_ref().unwrap().key().to_string())
            .await
            .unwrap();
        assert_eq!(rows[0].title, "Hi ada");
        assert!(rows[0].message.contains("ada@example.com"));
    }
}
