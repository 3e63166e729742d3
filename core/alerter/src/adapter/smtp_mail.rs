//! SMTP（暗黙 TLS・認証あり）でのメール送信

use super::config::MailSettings;
use crate::domain::OutgoingMail;
use crate::ports::outbound::MailTransport;
use common::error::Error;
use common::ports::outbound::{Log, LogRecord};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::sync::Arc;
use std::time::Duration;

/// 送信後の待ち時間（セッション終了の遅いサーバ向け）
pub const POST_SEND_DELAY: Duration = Duration::from_secs(5);

/// メールアドレスとして解釈できるか（設定読み込み時に使う）
pub fn validate_mailbox(field: &str, address: &str) -> Result<(), Error> {
    address
        .parse::<Mailbox>()
        .map(|_| ())
        .map_err(|e| Error::config(format!("Invalid smtp.{} '{}': {}", field, address, e)))
}

/// 先頭 3 文字 + "..."（ログ用）
fn preview(s: &str) -> String {
    format!("{}...", s.chars().take(3).collect::<String>())
}

fn build_message(mail: &OutgoingMail) -> Result<Message, Error> {
    let from = mail
        .from
        .parse::<Mailbox>()
        .map_err(|e| Error::mail(format!("Invalid sender '{}': {}", mail.from, e)))?;
    let to = mail
        .to
        .parse::<Mailbox>()
        .map_err(|e| Error::mail(format!("Invalid recipient '{}': {}", mail.to, e)))?;
    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| Error::mail(format!("Failed to build message: {}", e)))
}

/// lettre の SmtpTransport で送る MailTransport 実装
pub struct SmtpMailTransport {
    settings: MailSettings,
    log: Arc<dyn Log>,
    delay: Duration,
}

impl SmtpMailTransport {
    pub fn new(settings: MailSettings, log: Arc<dyn Log>) -> Self {
        Self {
            settings,
            log,
            delay: POST_SEND_DELAY,
        }
    }

    fn transport(&self) -> Result<SmtpTransport, Error> {
        let server = &self.settings.server;
        let mut builder = SmtpTransport::relay(&server.host).map_err(|e| {
            Error::mail(format!("Invalid smtp server '{}': {}", server.host, e))
        })?;
        if let Some(port) = server.port {
            builder = builder.port(port);
        }
        Ok(builder
            .credentials(Credentials::new(
                self.settings.username.clone(),
                self.settings.password.clone(),
            ))
            .build())
    }
}

impl MailTransport for SmtpMailTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<(), Error> {
        let _ = self.log.log(
            &LogRecord::info(format!(
                "Using: to: '{}', from: '{}', subject: '{}', body: '{}', smtpserver: '{}', username: '{}', password: '{}'",
                mail.to,
                mail.from,
                mail.subject,
                preview(&mail.body),
                self.settings.server,
                self.settings.username,
                preview(&self.settings.password),
            ))
            .layer("adapter")
            .kind("mail"),
        );

        let message = build_message(mail)?;
        self.transport()?
            .send(&message)
            .map_err(|e| Error::mail(format!("Failed to send email: {}", e)))?;

        std::thread::sleep(self.delay);
        Ok(())
    }
}

/// 送らずに stdout へ出す MailTransport 実装（--dry-run）
#[derive(Debug, Clone, Default)]
pub struct DryRunMailTransport;

impl MailTransport for DryRunMailTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<(), Error> {
        println!("To: {}", mail.to);
        println!("From: {}", mail.from);
        println!("Subject: {}", mail.subject);
        println!();
        println!("{}", mail.body);
        Ok(())
    }
}
