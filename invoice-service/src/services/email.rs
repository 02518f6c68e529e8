//! Email delivery of finished invoices.
//!
//! SMTP transport setup and the provider trait follow the shape of a
//! pluggable notification provider: a real SMTP implementation plus a mock
//! used whenever SMTP is disabled (local development, tests).

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not enabled: {0}")]
    NotEnabled(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Send error: {0}")]
    SendFailed(String),
}

/// One outbound invoice email: HTML body plus the rendered PDF attachment.
#[derive(Debug, Clone)]
pub struct InvoiceEmail {
    pub to: String,
    pub subject: String,
    pub body_html: String,
    pub attachment_name: String,
    pub pdf: Vec<u8>,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &InvoiceEmail) -> Result<(), ProviderError>;
    fn is_enabled(&self) -> bool;
}

pub struct SmtpProvider {
    config: SmtpConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpProvider {
    pub fn new(config: SmtpConfig) -> Result<Self, ProviderError> {
        if !config.enabled {
            return Ok(Self {
                config,
                transport: None,
            });
        }

        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create SMTP relay: {}", e))
            })?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            config,
            transport: Some(transport),
        })
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &InvoiceEmail) -> Result<(), ProviderError> {
        if !self.config.enabled {
            return Err(ProviderError::NotEnabled(
                "SMTP email provider is not enabled".to_string(),
            ));
        }

        let transport = self.transport.as_ref().ok_or_else(|| {
            ProviderError::Configuration("SMTP transport not initialized".to_string())
        })?;

        let from_mailbox: Mailbox =
            format!("{} <{}>", self.config.from_name, self.config.from_email)
                .parse()
                .map_err(|e| {
                    ProviderError::Configuration(format!("Invalid from address: {}", e))
                })?;

        let to_mailbox: Mailbox = email
            .to
            .parse()
            .map_err(|e| ProviderError::InvalidRecipient(format!("Invalid recipient: {}", e)))?;

        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| ProviderError::SendFailed(format!("Invalid content type: {}", e)))?;
        let attachment =
            Attachment::new(email.attachment_name.clone()).body(email.pdf.clone(), pdf_type);

        let message = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(&email.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.body_html.clone()),
                    )
                    .singlepart(attachment),
            )
            .map_err(|e| ProviderError::SendFailed(format!("Failed to build message: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| ProviderError::SendFailed(format!("Failed to send email: {}", e)))?;

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            attachment = %email.attachment_name,
            "Invoice email sent"
        );

        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

/// Mock email provider for local development and tests.
pub struct MockEmailProvider {
    enabled: bool,
    send_count: AtomicU64,
}

impl MockEmailProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            send_count: AtomicU64::new(0),
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, email: &InvoiceEmail) -> Result<(), ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotEnabled(
                "Mock email provider is not enabled".to_string(),
            ));
        }

        self.send_count.fetch_add(1, Ordering::SeqCst);

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            pdf_bytes = email.pdf.len(),
            "[MOCK] Invoice email would be sent"
        );

        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_email() -> InvoiceEmail {
        InvoiceEmail {
            to: "kunde@example.com".to_string(),
            subject: "Ihre Rechnung 2026-0001".to_string(),
            body_html: "<p>Rechnung</p>".to_string(),
            attachment_name: "rechnung-2026-0001.pdf".to_string(),
            pdf: b"%PDF-1.3 test".to_vec(),
        }
    }

    #[tokio::test]
    async fn mock_provider_counts_sends() {
        let provider = MockEmailProvider::new(true);

        provider.send(&sample_email()).await.unwrap();
        provider.send(&sample_email()).await.unwrap();

        assert_eq!(provider.send_count(), 2);
    }

    #[tokio::test]
    async fn disabled_mock_provider_refuses_to_send() {
        let provider = MockEmailProvider::new(false);

        let err = provider.send(&sample_email()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotEnabled(_)));
    }

    #[tokio::test]
    async fn disabled_smtp_provider_builds_without_transport() {
        let provider = SmtpProvider::new(SmtpConfig {
            host: "smtp.test.local".to_string(),
            port: 587,
            user: String::new(),
            password: String::new(),
            from_email: "info@example.com".to_string(),
            from_name: "Test".to_string(),
            enabled: false,
        })
        .unwrap();

        assert!(!provider.is_enabled());
        let err = provider.send(&sample_email()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotEnabled(_)));
    }
}
