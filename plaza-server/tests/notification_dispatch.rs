//! Notification pipeline tests: template resolution, fan-out persistence
//! and worker delivery, on the in-memory database engine.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use plaza_server::db::DbService;
use plaza_server::db::models::{NotificationTemplate, User, UserCreate};
use plaza_server::db::repository::{
    NotificationRepository, NotificationTemplateRepository, UserRepository, record_id,
};
use plaza_server::notify::{DispatchWorker, NotificationService, default_channels};
use shared::util::now_millis;
use shared::{
    NotificationChannel, NotificationEvent, NotificationStatus, UserRole,
};

async fn setup() -> DbService {
    DbService::memory().await.expect("in-memory db")
}

async fn seed_user(db: &DbService, email: &str) -> User {
    UserRepository::new(db.db.clone())
        .create(UserCreate {
            email: email.to_string(),
            password: "correct horse battery".to_string(),
            display_name: "Ana".to_string(),
            role: UserRole::Customer,
            tenant: None,
        })
        .await
        .expect("create user")
}

fn template(
    tenant: Option<&str>,
    event: NotificationEvent,
    channel: NotificationChannel,
    subject: &str,
) -> NotificationTemplate {
    NotificationTemplate {
        id: None,
        tenant: tenant.map(|t| record_id("tenant", t)),
        event,
        channel,
        subject: subject.to_string(),
        body: "Hello {{recipient_name}}".to_string(),
        is_active: true,
        created_at: now_millis(),
    }
}

#[tokio::test]
async fn tenant_override_beats_platform_default() {
    let db = setup().await;
    let templates = NotificationTemplateRepository::new(db.db.clone());

    templates
        .create(template(
            None,
            NotificationEvent::BookingConfirmed,
            NotificationChannel::Email,
            "platform default",
        ))
        .await
        .unwrap();
    templates
        .create(template(
            Some("t1"),
            NotificationEvent::BookingConfirmed,
            NotificationChannel::Email,
            "tenant override",
        ))
        .await
        .unwrap();

    let resolved = templates
        .resolve(
            Some("t1"),
            NotificationEvent::BookingConfirmed,
            NotificationChannel::Email,
        )
        .await
        .unwrap()
        .expect("resolved template");
    assert_eq!(resolved.subject, "tenant override");

    // Another tenant falls back to the platform default
    let fallback = templates
        .resolve(
            Some("t2"),
            NotificationEvent::BookingConfirmed,
            NotificationChannel::Email,
        )
        .await
        .unwrap()
        .expect("fallback template");
    assert_eq!(fallback.subject, "platform default");

    // Unknown pair resolves to nothing (service then uses builtins)
    let none = templates
        .resolve(
            Some("t1"),
            NotificationEvent::TenantApproved,
            NotificationChannel::Push,
        )
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn notify_persists_rendered_records_and_enqueues_jobs() {
    let db = setup().await;
    let user = seed_user(&db, "ana@example.com").await;
    let user_id = user.id.as_ref().unwrap().to_string();

    let (tx, mut rx) = mpsc::channel(16);
    let service = NotificationService::new(db.db.clone(), tx);

    let mut context = std::collections::HashMap::new();
    context.insert("reference".to_string(), "PLZ-ABC12345".to_string());
    context.insert("listing_name".to_string(), "Court 1".to_string());
    context.insert("date".to_string(), "2026-08-10".to_string());
    context.insert("start".to_string(), "09:00".to_string());

    // BookingCreated fans out to email + push
    service
        .notify(NotificationEvent::BookingCreated, &user, Some("t1"), &context)
        .await;

    let records = NotificationRepository::new(db.db.clone())
        .find_by_recipient(&user_id)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|n| n.status == NotificationStatus::Pending));
    assert!(records.iter().all(|n| n.subject.contains("PLZ-ABC12345")));
    // Placeholders resolved, none left behind
    assert!(records.iter().all(|n| !n.body.contains("{{")));

    let mut channels = vec![];
    while let Ok(job) = rx.try_recv() {
        channels.push(job.channel);
        assert_eq!(job.address, "ana@example.com");
    }
    channels.sort_by_key(|c| c.as_str());
    assert_eq!(
        channels,
        vec![NotificationChannel::Email, NotificationChannel::Push]
    );
}

#[tokio::test]
async fn worker_marks_notifications_sent() {
    let db = setup().await;
    let user = seed_user(&db, "ana@example.com").await;
    let user_id = user.id.as_ref().unwrap().to_string();

    let (tx, rx) = mpsc::channel(16);
    let service = NotificationService::new(db.db.clone(), tx);

    let shutdown = CancellationToken::new();
    let worker = DispatchWorker::new(db.db.clone(), default_channels());
    let worker_handle = tokio::spawn(worker.run(rx, shutdown.clone()));

    service
        .notify(
            NotificationEvent::TenantApproved,
            &user,
            Some("t1"),
            &std::collections::HashMap::new(),
        )
        .await;

    // Poll until the worker has recorded the delivery
    let notifications = NotificationRepository::new(db.db.clone());
    let mut sent = false;
    for _ in 0..50 {
        let records = notifications.find_by_recipient(&user_id).await.unwrap();
        if !records.is_empty()
            && records.iter().all(|n| n.status == NotificationStatus::Sent)
        {
            assert!(records.iter().all(|n| n.sent_at.is_some()));
            sent = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(sent, "worker did not mark the notification sent in time");

    shutdown.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), worker_handle).await;
}
