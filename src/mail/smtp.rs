// SMTP delivery backed by lettre

use super::{Mailer, OutgoingMail};
use crate::error::MailError;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::path::Path;
use tracing::info;

/// Where and how to reach the SMTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Negotiate STARTTLS before authenticating
    pub starttls: bool,
}

/// Mailer that opens one SMTP connection per message
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        let settings = &self.settings;
        let builder = if settings.starttls {
            SmtpTransport::starttls_relay(&settings.host)?
        } else {
            SmtpTransport::builder_dangerous(settings.host.as_str())
        };
        let builder = builder.port(settings.port);

        let builder = match &settings.user {
            Some(user) => builder.credentials(Credentials::new(
                user.clone(),
                settings.password.clone().unwrap_or_default(),
            )),
            None => builder,
        };

        Ok(builder.build())
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        send_mail(&self.transport()?, mail)?;
        info!(
            "Mail sent to {} recipient(s) via {}:{}",
            mail.to.len(),
            self.settings.host,
            self.settings.port
        );
        Ok(())
    }
}

/// Compose `mail` and hand it to `transport`.
///
/// Blocks until the server accepts or rejects it; there is no retry.
pub fn send_mail(transport: &SmtpTransport, mail: &OutgoingMail) -> Result<(), MailError> {
    let message = build_message(mail)?;
    transport.send(&message)?;
    Ok(())
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

/// Assemble the multipart message: text body first, then every attachment.
pub fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mailbox(&mail.from)?)
        .subject(mail.subject.as_str())
        .date_now();
    for recipient in &mail.to {
        builder = builder.to(mailbox(recipient)?);
    }

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(mail.body.clone()));
    for path in &mail.attachments {
        parts = parts.singlepart(attachment(path)?);
    }

    Ok(builder.multipart(parts)?)
}

fn attachment(path: &Path) -> Result<SinglePart, MailError> {
    let content = std::fs::read(path).map_err(|source| MailError::Attachment {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let content_type = ContentType::parse("application/octet-stream")?;
    Ok(Attachment::new(name).body(content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn mail(attachments: Vec<std::path::PathBuf>) -> OutgoingMail {
        OutgoingMail {
            from: "ci@example.com".to_string(),
            to: vec!["qa@example.com".to_string(), "dev@example.com".to_string()],
            subject: "Nightly results".to_string(),
            body: "Total: 3".to_string(),
            attachments,
        }
    }

    #[test]
    fn test_build_message_with_attachment() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("report.xlsx");
        let mut file = std::fs::File::create(&path).expect("Failed to create file");
        file.write_all(b"PK\x03\x04 fake workbook").expect("Failed to write");

        let message = build_message(&mail(vec![path])).expect("Failed to build message");
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("Subject: Nightly results"));
        assert!(raw.contains("qa@example.com"));
        assert!(raw.contains("dev@example.com"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("Total: 3"));
        assert!(raw.contains("application/octet-stream"));
        assert!(raw.contains("report.xlsx"));
    }

    #[test]
    fn test_build_message_rejects_bad_sender() {
        let mut bad = mail(Vec::new());
        bad.from = "not an address".to_string();

        let err = build_message(&bad).unwrap_err();
        assert!(matches!(err, MailError::Address { ref address, .. } if address == "not an address"));
    }

    #[test]
    fn test_send_mail_fails_before_connecting_on_missing_attachment() {
        let transport = SmtpTransport::builder_dangerous("127.0.0.1").port(1).build();

        let err = send_mail(&transport, &mail(vec!["/nonexistent/report.xlsx".into()]))
            .unwrap_err();

        assert!(matches!(err, MailError::Attachment { .. }));
    }

    #[test]
    fn test_build_message_missing_attachment() {
        let err = build_message(&mail(vec!["/nonexistent/report.xlsx".into()])).unwrap_err();
        assert!(matches!(err, MailError::Attachment { .. }));
    }
}
