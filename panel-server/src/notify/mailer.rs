//! Mailer abstraction

use async_trait::async_trait;
use rand::Rng;
use shared::models::NotificationPriority;
use shared::util::now_millis;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Provider acknowledgement for one delivered email
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub message_id: String,
    pub timestamp: i64,
}

/// Email transport seam. The production implementation would talk to an
/// SMTP relay or provider API; tests and development use [`MockMailer`].
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        priority: NotificationPriority,
    ) -> Result<SentEmail, MailError>;
}

/// Development mailer: logs the message, sleeps 500-1500 ms to imitate
/// provider latency and fails roughly 5% of the time.
#[derive(Debug, Default, Clone)]
pub struct MockMailer;

#[async_trait]
impl Mailer for MockMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        priority: NotificationPriority,
    ) -> Result<SentEmail, MailError> {
        // draw before the await, ThreadRng is not Send
        let (delay_ms, fail) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(500..1500), rng.gen_bool(0.05))
        };
        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;

        if fail {
            tracing::warn!(to, subject, "Mock mailer simulated delivery failure");
            return Err(MailError::Delivery("simulated provider failure".to_string()));
        }

        let message_id = Uuid::new_v4().to_string();
        tracing::info!(
            to,
            subject,
            ?priority,
            message_id,
            body_len = body.len(),
            "Mock mailer delivered email"
        );
        Ok(SentEmail {
            message_id,
            timestamp: now_millis(),
        })
    }
}
