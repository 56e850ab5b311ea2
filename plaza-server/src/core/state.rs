//! Server state
//!
//! [`ServerState`] holds the shared service handles (database, JWT,
//! notification service, slot guard) behind cheap clones.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::DbService;
use crate::db::repository::{BookingRepository, UserRepository};
use crate::notify::{
    DispatchJob, DispatchWorker, NotificationService, booking_context, default_channels,
};
use shared::NotificationEvent;
use shared::util::now_millis;

/// Dispatch queue depth; jobs beyond this apply backpressure to the
/// enqueueing request
const DISPATCH_QUEUE_SIZE: usize = 256;

/// In-process arbitration for concurrent booking attempts.
///
/// Booking creation acquires a lease on (listing, date, start) before the
/// availability re-check and releases it after the insert. Two
/// simultaneous requests for the same window: one gets the lease, the
/// other gets a conflict. The map never holds more than the in-flight
/// requests.
#[derive(Debug, Default)]
pub struct SlotGuard {
    locks: DashMap<String, ()>,
}

impl SlotGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to take the lease for a window key. `None` means another
    /// request currently holds it.
    pub fn try_acquire(&self, key: &str) -> Option<SlotLease<'_>> {
        match self.locks.entry(key.to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                entry.insert(());
                Some(SlotLease {
                    locks: &self.locks,
                    key: key.to_string(),
                })
            }
        }
    }
}

/// Held lease; releases on drop
pub struct SlotLease<'a> {
    locks: &'a DashMap<String, ()>,
    key: String,
}

impl Drop for SlotLease<'_> {
    fn drop(&mut self) {
        self.locks.remove(&self.key);
    }
}

/// Server state - shared handles for all services
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT service (shared)
    pub jwt_service: Arc<JwtService>,
    /// Notification render/persist/enqueue service
    notifier: NotificationService,
    /// Receiver side of the dispatch queue, taken by the worker at startup
    dispatch_rx: Arc<Mutex<Option<mpsc::Receiver<DispatchJob>>>>,
    /// Booking window arbitration
    slot_guard: Arc<SlotGuard>,
}

impl ServerState {
    /// Initialize server state: work_dir layout, database, services.
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened; the server is useless
    /// without it.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("plaza.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::with_db(config.clone(), db_service.db)
    }

    /// Build state over an existing database handle (tests use the
    /// in-memory engine here)
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let (tx, rx) = mpsc::channel(DISPATCH_QUEUE_SIZE);
        let notifier = NotificationService::new(db.clone(), tx);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            db,
            jwt_service,
            notifier,
            dispatch_rx: Arc::new(Mutex::new(Some(rx))),
            slot_guard: Arc::new(SlotGuard::new()),
        }
    }

    /// Start background tasks: the dispatch worker and the pending-hold
    /// sweep. Must be called once, before serving traffic.
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        // Notification dispatch worker
        let rx = self
            .dispatch_rx
            .lock()
            .expect("dispatch_rx lock poisoned")
            .take();
        match rx {
            Some(rx) => {
                let worker = DispatchWorker::new(self.get_db(), default_channels());
                let shutdown = tasks.shutdown_token();
                tasks.spawn("dispatch_worker", TaskKind::Worker, async move {
                    worker.run(rx, shutdown).await;
                });
            }
            None => tracing::warn!("Dispatch worker already started, skipping"),
        }

        // Pending-booking expiry sweep
        let state = self.clone();
        let shutdown = tasks.shutdown_token();
        tasks.spawn("booking_expiry_sweep", TaskKind::Periodic, async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = interval.tick() => state.expire_stale_bookings().await,
                }
            }
        });
    }

    /// Cancel pending bookings older than the hold window and notify
    /// their customers.
    pub async fn expire_stale_bookings(&self) {
        let cutoff = now_millis() - self.config.booking_hold_minutes * 60_000;
        let bookings = BookingRepository::new(self.get_db());

        let expired = match bookings.expire_pending_before(cutoff).await {
            Ok(expired) => expired,
            Err(e) => {
                tracing::error!(error = %e, "Booking expiry sweep failed");
                return;
            }
        };
        if expired.is_empty() {
            return;
        }

        tracing::info!(count = expired.len(), "Expired pending bookings");

        let users = UserRepository::new(self.get_db());
        for booking in &expired {
            let customer_id = booking.customer.to_string();
            if let Ok(Some(customer)) = users.find_by_id(&customer_id).await {
                self.notifier
                    .notify(
                        NotificationEvent::BookingCancelled,
                        &customer,
                        Some(&booking.tenant.to_string()),
                        &booking_context(booking),
                    )
                    .await;
            }
        }
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Get the notification service
    pub fn notifier(&self) -> &NotificationService {
        &self.notifier
    }

    /// Get the booking window guard
    pub fn slot_guard(&self) -> &SlotGuard {
        &self.slot_guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_guard_single_holder() {
        let guard = SlotGuard::new();
        let lease = guard.try_acquire("listing:1|2026-08-10|09:00");
        assert!(lease.is_some());
        assert!(guard.try_acquire("listing:1|2026-08-10|09:00").is_none());
        // A different window is unaffected
        assert!(guard.try_acquire("listing:1|2026-08-10|10:00").is_some());
    }

    #[test]
    fn test_slot_guard_releases_on_drop() {
        let guard = SlotGuard::new();
        {
            let _lease = guard.try_acquire("key").unwrap();
            assert!(guard.try_acquire("key").is_none());
        }
        assert!(guard.try_acquire("key").is_some());
    }
}
