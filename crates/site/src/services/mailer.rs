//! Outbound mail for contact submissions.
//!
//! Each accepted submission produces two messages: a notification to the
//! admin inbox and a confirmation to the address the visitor supplied.
//! Both are multipart (plain text plus HTML) rendered from askama
//! templates under `templates/email/`.

use std::sync::{Arc, Mutex};

use askama::Template;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header},
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::MailConfig;
use crate::models::NewContact;

/// Errors that can occur when sending mail.
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

/// A message recorded by a capturing mailer.
#[derive(Debug, Clone)]
pub struct CapturedMail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
}

#[derive(Clone)]
enum MailTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Capture(Arc<Mutex<Vec<CapturedMail>>>),
}

/// Sends contact notification mail over SMTP.
#[derive(Clone)]
pub struct Mailer {
    transport: MailTransport,
    from: Mailbox,
    admin: Mailbox,
}

impl Mailer {
    /// Create a mailer backed by a STARTTLS relay.
    ///
    /// Credentials are attached only when both a username and a password
    /// are configured.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` if the relay host or a configured address is
    /// invalid.
    pub fn new(config: &MailConfig) -> Result<Self, MailerError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().to_string(),
            ));
        }

        Ok(Self {
            transport: MailTransport::Smtp(builder.build()),
            from: mailbox(Some(&config.from_name), config.from_address.as_str())?,
            admin: mailbox(None, config.admin_email.as_str())?,
        })
    }

    /// Create a mailer that records messages instead of sending them.
    ///
    /// Used by tests to observe notification traffic without a relay.
    ///
    /// # Errors
    ///
    /// Returns `MailerError::InvalidAddress` if either address fails to
    /// parse.
    pub fn capturing(from_address: &str, admin_email: &str) -> Result<Self, MailerError> {
        Ok(Self {
            transport: MailTransport::Capture(Arc::new(Mutex::new(Vec::new()))),
            from: mailbox(Some("Larkspur Studio"), from_address)?,
            admin: mailbox(None, admin_email)?,
        })
    }

    /// Messages recorded by a capturing mailer, oldest first.
    ///
    /// Always empty for an SMTP-backed mailer.
    #[must_use]
    pub fn captured(&self) -> Vec<CapturedMail> {
        match &self.transport {
            MailTransport::Capture(mail) => mail.lock().map(|m| m.clone()).unwrap_or_default(),
            MailTransport::Smtp(_) => Vec::new(),
        }
    }

    /// Notify the admin inbox about a new submission.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` if rendering or sending fails.
    pub async fn send_contact_notification(
        &self,
        submission: &NewContact,
    ) -> Result<(), MailerError> {
        let subject = format!("New contact request: {}", submission.subject);
        let html = NotificationHtml {
            contact: submission,
        }
        .render()?;
        let text = NotificationText {
            contact: submission,
        }
        .render()?;

        self.send(self.admin.clone(), &subject, html, text).await
    }

    /// Confirm receipt to the address the visitor supplied.
    ///
    /// # Errors
    ///
    /// Returns `MailerError::InvalidAddress` if the visitor-supplied address
    /// is not a deliverable mailbox, or another `MailerError` if rendering
    /// or sending fails.
    pub async fn send_contact_confirmation(
        &self,
        submission: &NewContact,
    ) -> Result<(), MailerError> {
        let to = mailbox(Some(&submission.name), &submission.email)?;
        let html = ConfirmationHtml {
            name: &submission.name,
        }
        .render()?;
        let text = ConfirmationText {
            name: &submission.name,
        }
        .render()?;

        self.send(to, "Contact request received successfully", html, text)
            .await
    }

    async fn send(
        &self,
        to: Mailbox,
        subject: &str,
        html: String,
        text: String,
    ) -> Result<(), MailerError> {
        match &self.transport {
            MailTransport::Smtp(transport) => {
                let message = Message::builder()
                    .from(self.from.clone())
                    .to(to)
                    .subject(subject)
                    .multipart(
                        MultiPart::alternative()
                            .singlepart(
                                SinglePart::builder()
                                    .header(header::ContentType::TEXT_PLAIN)
                                    .body(text),
                            )
                            .singlepart(
                                SinglePart::builder()
                                    .header(header::ContentType::TEXT_HTML)
                                    .body(html),
                            ),
                    )?;

                transport.send(message).await?;
                Ok(())
            }
            MailTransport::Capture(mail) => {
                let recorded = CapturedMail {
                    to: to.email.to_string(),
                    subject: subject.to_string(),
                    text_body: text,
                };
                if let Ok(mut mail) = mail.lock() {
                    mail.push(recorded);
                }
                Ok(())
            }
        }
    }
}

/// Build a mailbox from an optional display name and an address.
fn mailbox(name: Option<&str>, address: &str) -> Result<Mailbox, MailerError> {
    let parsed = address
        .parse::<Address>()
        .map_err(|_| MailerError::InvalidAddress(address.to_string()))?;
    Ok(Mailbox::new(name.map(String::from), parsed))
}

#[derive(Template)]
#[template(path = "email/contact_notification.html")]
struct NotificationHtml<'a> {
    contact: &'a NewContact,
}

#[derive(Template)]
#[template(path = "email/contact_notification.txt")]
struct NotificationText<'a> {
    contact: &'a NewContact,
}

#[derive(Template)]
#[template(path = "email/contact_confirmation.html")]
struct ConfirmationHtml<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/contact_confirmation.txt")]
struct ConfirmationText<'a> {
    name: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn submission() -> NewContact {
        NewContact {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 20 7946 0000".to_string(),
            subject: "Commission inquiry".to_string(),
            message: "I would like to discuss a project.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_notification_goes_to_admin() {
        let mailer = Mailer::capturing("studio@example.com", "admin@example.com").unwrap();
        mailer
            .send_contact_notification(&submission())
            .await
            .unwrap();

        let mail = mailer.captured();
        let sent = mail.first().unwrap();
        assert_eq!(sent.to, "admin@example.com");
        assert_eq!(sent.subject, "New contact request: Commission inquiry");
        assert!(sent.text_body.contains("Ada Lovelace"));
        assert!(sent.text_body.contains("ada@example.com"));
        assert!(sent.text_body.contains("I would like to discuss a project."));
    }

    #[tokio::test]
    async fn test_confirmation_goes_to_visitor() {
        let mailer = Mailer::capturing("studio@example.com", "admin@example.com").unwrap();
        mailer
            .send_contact_confirmation(&submission())
            .await
            .unwrap();

        let mail = mailer.captured();
        let sent = mail.first().unwrap();
        assert_eq!(sent.to, "ada@example.com");
        assert_eq!(sent.subject, "Contact request received successfully");
        assert!(
            sent.text_body
                .contains("Thank you for contacting us. We will get back to you soon.")
        );
    }

    #[tokio::test]
    async fn test_confirmation_rejects_unparseable_address() {
        let mailer = Mailer::capturing("studio@example.com", "admin@example.com").unwrap();
        let mut bad = submission();
        bad.email = "not an address".to_string();

        let err = mailer.send_contact_confirmation(&bad).await.unwrap_err();
        assert!(matches!(err, MailerError::InvalidAddress(_)));
        assert!(mailer.captured().is_empty());
    }
}
