//! Delivery channels
//!
//! Provider integrations are stubs that log the delivery; the dispatch
//! pipeline (render, persist, fan-out, status tracking) is real.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use shared::NotificationChannel;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Delivery failed: {0}")]
    Failed(String),
}

/// A transport capable of delivering one rendered notification
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn kind(&self) -> NotificationChannel;

    /// Deliver `subject`/`body` to `address` (email address or user id,
    /// depending on the transport)
    async fn deliver(&self, address: &str, subject: &str, body: &str)
    -> Result<(), ChannelError>;
}

/// Email transport
// TODO: wire a real SMTP transport (lettre) once provider credentials exist
pub struct EmailChannel;

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn kind(&self) -> NotificationChannel {
        NotificationChannel::Email
    }

    async fn deliver(
        &self,
        address: &str,
        subject: &str,
        _body: &str,
    ) -> Result<(), ChannelError> {
        tracing::info!(
            target: "notify",
            channel = "email",
            to = %address,
            subject = %subject,
            "Email delivered (stub)"
        );
        Ok(())
    }
}

/// SMS transport
pub struct SmsChannel;

#[async_trait]
impl DeliveryChannel for SmsChannel {
    fn kind(&self) -> NotificationChannel {
        NotificationChannel::Sms
    }

    async fn deliver(
        &self,
        address: &str,
        _subject: &str,
        body: &str,
    ) -> Result<(), ChannelError> {
        tracing::info!(
            target: "notify",
            channel = "sms",
            to = %address,
            body = %body,
            "SMS delivered (stub)"
        );
        Ok(())
    }
}

/// Mobile push transport
pub struct PushChannel;

#[async_trait]
impl DeliveryChannel for PushChannel {
    fn kind(&self) -> NotificationChannel {
        NotificationChannel::Push
    }

    async fn deliver(
        &self,
        address: &str,
        subject: &str,
        _body: &str,
    ) -> Result<(), ChannelError> {
        tracing::info!(
            target: "notify",
            channel = "push",
            to = %address,
            title = %subject,
            "Push delivered (stub)"
        );
        Ok(())
    }
}

/// The transports registered with the dispatch worker
pub fn default_channels() -> Vec<Arc<dyn DeliveryChannel>> {
    vec![
        Arc::new(EmailChannel),
        Arc::new(SmsChannel),
        Arc::new(PushChannel),
    ]
}
