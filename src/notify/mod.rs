//! Email notification dispatch.
//!
//! After a pipeline run completes, the meeting summary is mailed to every
//! participant with a recorded address. Sends fan out concurrently and
//! settle independently — one refused recipient never blocks or cancels
//! the rest — and every attempt lands in the append-only notification log.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::EmailConfig;
use crate::db::{
    Database, Meeting, NewNotification, NotificationStatus, Participant, Summary,
};

/// One outbound email. Implementations report failures as `Err`; the
/// dispatcher records them without escalating.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// SMTP delivery via lettre. Plaintext transport by default (a local
/// relay or capture target); credentials are attached when configured.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .context("Invalid from address in email config")?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        info!(
            "Initialized SMTP mailer for {}:{}",
            config.smtp_host, config.smtp_port
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(to.parse().context("Invalid recipient address")?)
            .subject(subject)
            .body(body.to_string())
            .context("Failed to build email")?;

        self.transport
            .send(email)
            .await
            .context("Failed to send email")?;

        Ok(())
    }
}

/// Outcome of one notification pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Fans summary emails out to participants and logs every attempt.
pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
    db: Database,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, db: Database) -> Self {
        Self { transport, db }
    }

    pub async fn notify(
        &self,
        meeting: &Meeting,
        summary: &Summary,
        participants: &[Participant],
    ) -> DispatchReport {
        let recipients: Vec<&Participant> = participants
            .iter()
            .filter(|p| p.email.as_deref().is_some_and(|e| !e.is_empty()))
            .collect();

        if recipients.is_empty() {
            info!(
                "Meeting {}: no participants with email addresses, skipping notifications",
                meeting.id
            );
            return DispatchReport::default();
        }

        let subject = format!("Meeting Summary: {}", meeting.title);
        let content = render_summary_email(meeting, summary);

        // Settle every send; never cancel the batch on the first failure.
        let sends = recipients.iter().map(|participant| {
            let email = participant.email.clone().unwrap_or_default();
            let transport = Arc::clone(&self.transport);
            let subject = subject.clone();
            let content = content.clone();

            async move {
                let result = transport.send(&email, &subject, &content).await;
                (email, result)
            }
        });

        let results = futures::future::join_all(sends).await;

        let mut report = DispatchReport::default();
        for (email, result) in results {
            let (status, error_message) = match &result {
                Ok(()) => {
                    report.sent += 1;
                    (NotificationStatus::Sent, None)
                }
                Err(e) => {
                    warn!("Failed to send summary to {}: {:#}", email, e);
                    report.failed += 1;
                    report.errors.push(format!("{email}: {e:#}"));
                    (NotificationStatus::Failed, Some(format!("{e:#}")))
                }
            };

            let log_entry = NewNotification {
                recipient_email: email.clone(),
                subject: subject.clone(),
                content: content.clone(),
                status,
                error_message,
            };

            if let Err(e) = self.db.append_notification(&meeting.id, log_entry).await {
                warn!("Failed to log notification for {}: {:#}", email, e);
            }
        }

        info!(
            "Meeting {}: notifications sent={} failed={}",
            meeting.id, report.sent, report.failed
        );

        report
    }
}

/// Shared plain-text body. Every recipient gets the same content.
fn render_summary_email(meeting: &Meeting, summary: &Summary) -> String {
    let mut body = format!(
        "Meeting Summary: {}\n\nSummary:\n{}\n",
        meeting.title, summary.summary_text
    );

    body.push_str("\nKey Points:\n");
    for (i, point) in summary.key_points.iter().enumerate() {
        body.push_str(&format!("{}. {}\n", i + 1, point));
    }

    body.push_str("\nAction Items:\n");
    for (i, item) in summary.action_items.iter().enumerate() {
        body.push_str(&format!("{}. {}\n", i + 1, item));
    }

    if !summary.decisions.is_empty() {
        body.push_str("\nDecisions Made:\n");
        for (i, decision) in summary.decisions.iter().enumerate() {
            body.push_str(&format!("{}. {}\n", i + 1, decision));
        }
    }

    if !summary.next_steps.is_empty() {
        body.push_str("\nNext Steps:\n");
        for (i, step) in summary.next_steps.iter().enumerate() {
            body.push_str(&format!("{}. {}\n", i + 1, step));
        }
    }

    let minutes = meeting.duration_seconds.unwrap_or(0) / 60;
    body.push_str(&format!(
        "\nMeeting Date: {}\nDuration: {} minutes\n\n---\nThis summary was automatically generated by Meeting Assistant.",
        meeting.start_time, minutes
    ));

    body
}
