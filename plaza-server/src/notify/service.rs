//! Notification service
//!
//! Renders, persists and enqueues notifications. Delivery itself happens
//! in [`crate::notify::DispatchWorker`]; the service returns as soon as
//! the records are stored and the jobs are queued.

use std::collections::HashMap;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use crate::db::models::{Booking, Notification, Tenant, User};
use crate::db::repository::{NotificationRepository, NotificationTemplateRepository};
use crate::notify::renderer::{builtin_template, render};
use shared::util::now_millis;
use shared::{NotificationChannel, NotificationEvent, NotificationStatus};

/// One delivery handed to the worker
#[derive(Debug, Clone)]
pub struct DispatchJob {
    pub notification_id: String,
    pub channel: NotificationChannel,
    /// Email address (stub transports accept it for every channel)
    pub address: String,
    pub subject: String,
    pub body: String,
}

/// Channels an event fans out to
fn channels_for(event: NotificationEvent) -> &'static [NotificationChannel] {
    use NotificationChannel::*;
    match event {
        NotificationEvent::BookingCreated => &[Email, Push],
        NotificationEvent::BookingConfirmed => &[Email, Sms],
        NotificationEvent::BookingCancelled => &[Email, Push],
        NotificationEvent::TenantApproved | NotificationEvent::TenantSuspended => &[Email],
    }
}

#[derive(Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
    templates: NotificationTemplateRepository,
    tx: mpsc::Sender<DispatchJob>,
}

impl NotificationService {
    pub fn new(db: Surreal<Db>, tx: mpsc::Sender<DispatchJob>) -> Self {
        Self {
            notifications: NotificationRepository::new(db.clone()),
            templates: NotificationTemplateRepository::new(db),
            tx,
        }
    }

    /// Fan an event out to the recipient across the event's channels.
    ///
    /// Failures are logged, never propagated: a notification problem must
    /// not fail the request that triggered it.
    pub async fn notify(
        &self,
        event: NotificationEvent,
        recipient: &User,
        tenant_id: Option<&str>,
        context: &HashMap<String, String>,
    ) {
        let Some(recipient_id) = recipient.id.as_ref().map(|id| id.to_string()) else {
            tracing::warn!(event = event.as_str(), "Notification recipient has no id, skipping");
            return;
        };

        let mut context = context.clone();
        context.insert("recipient_name".to_string(), recipient.display_name.clone());

        for &channel in channels_for(event) {
            let (subject_tpl, body_tpl) = match self.resolve_template(tenant_id, event, channel).await
            {
                Some((s, b)) => (s, b),
                None => {
                    let (s, b) = builtin_template(event, channel);
                    (s.to_string(), b.to_string())
                }
            };

            let subject = render(&subject_tpl, &context);
            let body = render(&body_tpl, &context);

            let record = Notification {
                id: None,
                recipient: crate::db::repository::record_id("user", &recipient_id),
                tenant: tenant_id.map(|t| crate::db::repository::record_id("tenant", t)),
                event,
                channel,
                subject: subject.clone(),
                body: body.clone(),
                status: NotificationStatus::Pending,
                is_read: false,
                created_at: now_millis(),
                sent_at: None,
                error: None,
            };

            let stored = match self.notifications.create(record).await {
                Ok(n) => n,
                Err(e) => {
                    tracing::error!(
                        event = event.as_str(),
                        channel = channel.as_str(),
                        error = %e,
                        "Failed to persist notification"
                    );
                    continue;
                }
            };

            let Some(notification_id) = stored.id.as_ref().map(|id| id.to_string()) else {
                continue;
            };

            let job = DispatchJob {
                notification_id,
                channel,
                address: recipient.email.clone(),
                subject,
                body,
            };

            if let Err(e) = self.tx.send(job).await {
                tracing::error!(error = %e, "Dispatch queue closed, notification stays pending");
            }
        }
    }

    async fn resolve_template(
        &self,
        tenant_id: Option<&str>,
        event: NotificationEvent,
        channel: NotificationChannel,
    ) -> Option<(String, String)> {
        match self.templates.resolve(tenant_id, event, channel).await {
            Ok(Some(t)) => Some((t.subject, t.body)),
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, "Template lookup failed, using builtin");
                None
            }
        }
    }
}

/// Context map for booking events
pub fn booking_context(booking: &Booking) -> HashMap<String, String> {
    let mut ctx = HashMap::new();
    ctx.insert("reference".to_string(), booking.reference.clone());
    ctx.insert("listing_name".to_string(), booking.listing_name.clone());
    ctx.insert("date".to_string(), booking.date.clone());
    ctx.insert("start".to_string(), booking.start.clone());
    ctx.insert("end".to_string(), booking.end.clone());
    ctx.insert("guests".to_string(), booking.guests.to_string());
    ctx.insert(
        "total_amount".to_string(),
        format!("{:.2}", booking.total_amount),
    );
    ctx.insert("currency".to_string(), booking.currency.clone());
    ctx
}

/// Context map for tenant lifecycle events
pub fn tenant_context(tenant: &Tenant) -> HashMap<String, String> {
    let mut ctx = HashMap::new();
    ctx.insert("tenant_name".to_string(), tenant.name.clone());
    ctx
}
