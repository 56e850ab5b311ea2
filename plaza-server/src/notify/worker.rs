//! Dispatch Worker
//!
//! Consumes dispatch jobs from the notification service and drives the
//! delivery channels. Runs as a background task until the queue closes
//! or shutdown is signalled.

use std::collections::HashMap;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::db::repository::NotificationRepository;
use crate::notify::channel::DeliveryChannel;
use crate::notify::service::DispatchJob;
use shared::{NotificationChannel, NotificationStatus};

pub struct DispatchWorker {
    notifications: NotificationRepository,
    channels: HashMap<NotificationChannel, Arc<dyn DeliveryChannel>>,
}

impl DispatchWorker {
    pub fn new(db: Surreal<Db>, channels: Vec<Arc<dyn DeliveryChannel>>) -> Self {
        Self {
            notifications: NotificationRepository::new(db),
            channels: channels.into_iter().map(|c| (c.kind(), c)).collect(),
        }
    }

    /// Run the worker (blocks until the channel closes or shutdown fires)
    pub async fn run(self, mut job_rx: mpsc::Receiver<DispatchJob>, shutdown: CancellationToken) {
        tracing::info!("Notification dispatch worker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Dispatch worker received shutdown signal");
                    break;
                }
                job = job_rx.recv() => {
                    let Some(job) = job else {
                        tracing::info!("Dispatch queue closed, worker stopping");
                        break;
                    };
                    self.handle_job(job).await;
                }
            }
        }
    }

    /// Deliver one job and record the outcome. Failures are recorded on
    /// the notification; the worker loop itself never dies on them.
    async fn handle_job(&self, job: DispatchJob) {
        let Some(channel) = self.channels.get(&job.channel) else {
            tracing::error!(
                channel = job.channel.as_str(),
                "No transport registered for channel"
            );
            self.record_outcome(
                &job.notification_id,
                NotificationStatus::Failed,
                Some("no transport registered".to_string()),
            )
            .await;
            return;
        };

        match channel.deliver(&job.address, &job.subject, &job.body).await {
            Ok(()) => {
                self.record_outcome(&job.notification_id, NotificationStatus::Sent, None)
                    .await;
            }
            Err(e) => {
                tracing::warn!(
                    notification_id = %job.notification_id,
                    channel = job.channel.as_str(),
                    error = %e,
                    "Delivery failed"
                );
                self.record_outcome(
                    &job.notification_id,
                    NotificationStatus::Failed,
                    Some(e.to_string()),
                )
                .await;
            }
        }
    }

    async fn record_outcome(&self, id: &str, status: NotificationStatus, error: Option<String>) {
        if let Err(e) = self.notifications.set_delivery_status(id, status, error).await {
            tracing::error!(notification_id = %id, error = %e, "Failed to record delivery status");
        }
    }
}
