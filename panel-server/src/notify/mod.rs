//! Notification fan-out: mailer abstraction, templates, dispatcher and
//! the scheduled-send worker.

mod dispatcher;
mod mailer;
mod template;
mod worker;

pub use dispatcher::{BatchSummary, NotificationDispatcher, RecipientResult};
pub use mailer::{MailError, Mailer, MockMailer, SentEmail};
pub use template::{CannedTemplate, canned_templates, render};
pub use worker::ScheduleWorker;
