//! End-to-end booking flow over the repositories and domain modules,
//! running on the in-memory database engine.

use chrono::NaiveDate;

use plaza_server::availability;
use plaza_server::db::DbService;
use plaza_server::db::models::{Booking, Coupon, DayHours, Listing, Tenant, UserCreate};
use plaza_server::db::repository::{
    BookingRepository, CouponRepository, ListingRepository, RepoError, TenantRepository,
    UserRepository, record_id,
};
use plaza_server::pricing;
use shared::util::now_millis;
use shared::{BookingStatus, DiscountType, ListingCategory, TenantStatus, UserRole};

// 2026-08-10 is a Monday
const DATE: &str = "2026-08-10";

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
}

async fn setup() -> DbService {
    DbService::memory().await.expect("in-memory db")
}

async fn seed_tenant(db: &DbService) -> Tenant {
    TenantRepository::new(db.db.clone())
        .create(Tenant {
            id: None,
            name: "Riverside Sports".to_string(),
            contact_email: "ops@riverside.example".to_string(),
            contact_phone: None,
            owner: None,
            status: TenantStatus::Approved,
            created_at: now_millis(),
        })
        .await
        .expect("create tenant")
}

async fn seed_listing(db: &DbService, tenant: &Tenant, capacity: u32) -> Listing {
    let listings = ListingRepository::new(db.db.clone());
    listings
        .create(Listing {
            id: None,
            tenant: tenant.id.clone().unwrap(),
            name: "Court 1".to_string(),
            description: None,
            category: ListingCategory::Turf,
            city: "Porto".to_string(),
            address: None,
            price_per_slot: 40.0,
            currency: "EUR".to_string(),
            capacity,
            slot_duration_minutes: 60,
            operating_hours: vec![DayHours {
                day: 1,
                open: "09:00".to_string(),
                close: "12:00".to_string(),
            }],
            timezone: "UTC".to_string(),
            amenities: vec![],
            photos: vec![],
            is_active: true,
            is_approved: true,
            created_at: now_millis(),
        })
        .await
        .expect("create listing")
}

fn make_booking(
    listing: &Listing,
    customer_id: &str,
    start: &str,
    end: &str,
    status: BookingStatus,
) -> Booking {
    Booking {
        id: None,
        reference: shared::util::reference_code(),
        listing: listing.id.clone().unwrap(),
        tenant: listing.tenant.clone(),
        customer: record_id("user", customer_id),
        listing_name: listing.name.clone(),
        date: DATE.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        guests: 2,
        base_amount: 40.0,
        discount_amount: 0.0,
        total_amount: 40.0,
        currency: "EUR".to_string(),
        coupon_code: None,
        status,
        note: None,
        created_at: now_millis(),
        updated_at: now_millis(),
    }
}

#[tokio::test]
async fn booked_window_disappears_from_availability() {
    let db = setup().await;
    let tenant = seed_tenant(&db).await;
    let listing = seed_listing(&db, &tenant, 1).await;
    let listing_id = listing.id.as_ref().unwrap().to_string();

    let bookings = BookingRepository::new(db.db.clone());
    bookings
        .create(make_booking(&listing, "u1", "10:00", "11:00", BookingStatus::Confirmed))
        .await
        .expect("create booking");

    let occupying = bookings.find_occupying(&listing_id, DATE).await.unwrap();
    assert_eq!(occupying.len(), 1);

    let windows = availability::generate(&listing, monday(), &occupying, &[]).unwrap();
    assert_eq!(windows.len(), 3);
    assert!(windows[0].available); // 09:00
    assert!(!windows[1].available); // 10:00 - booked
    assert!(windows[2].available); // 11:00
}

#[tokio::test]
async fn cancelled_booking_frees_its_window() {
    let db = setup().await;
    let tenant = seed_tenant(&db).await;
    let listing = seed_listing(&db, &tenant, 1).await;
    let listing_id = listing.id.as_ref().unwrap().to_string();

    let bookings = BookingRepository::new(db.db.clone());
    let booking = bookings
        .create(make_booking(&listing, "u1", "09:00", "10:00", BookingStatus::Pending))
        .await
        .unwrap();
    let booking_id = booking.id.as_ref().unwrap().to_string();

    assert_eq!(bookings.find_occupying(&listing_id, DATE).await.unwrap().len(), 1);

    let cancelled = bookings
        .update_status(&booking_id, BookingStatus::Cancelled, None)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let occupying = bookings.find_occupying(&listing_id, DATE).await.unwrap();
    assert!(occupying.is_empty());

    let windows = availability::generate(&listing, monday(), &occupying, &[]).unwrap();
    assert!(windows.iter().all(|w| w.available));
}

#[tokio::test]
async fn capacity_two_fills_after_two_bookings() {
    let db = setup().await;
    let tenant = seed_tenant(&db).await;
    let listing = seed_listing(&db, &tenant, 2).await;
    let listing_id = listing.id.as_ref().unwrap().to_string();

    let bookings = BookingRepository::new(db.db.clone());
    bookings
        .create(make_booking(&listing, "u1", "09:00", "10:00", BookingStatus::Confirmed))
        .await
        .unwrap();

    let occupying = bookings.find_occupying(&listing_id, DATE).await.unwrap();
    let windows = availability::generate(&listing, monday(), &occupying, &[]).unwrap();
    assert!(windows[0].available);
    assert_eq!(windows[0].remaining_capacity, 1);

    bookings
        .create(make_booking(&listing, "u2", "09:00", "10:00", BookingStatus::Pending))
        .await
        .unwrap();

    let occupying = bookings.find_occupying(&listing_id, DATE).await.unwrap();
    let windows = availability::generate(&listing, monday(), &occupying, &[]).unwrap();
    assert!(!windows[0].available);
}

#[tokio::test]
async fn coupon_redemption_counts_against_limits() {
    let db = setup().await;
    let tenant = seed_tenant(&db).await;
    let tenant_id = tenant.id.as_ref().unwrap().to_string();

    let coupons = CouponRepository::new(db.db.clone());
    let coupon = coupons
        .create(Coupon {
            id: None,
            tenant: tenant.id.clone().unwrap(),
            code: "welcome10".to_string(),
            description: None,
            discount_type: DiscountType::Percentage,
            value: 10.0,
            min_order_amount: None,
            max_discount_amount: None,
            valid_from: 0,
            valid_until: now_millis() + 86_400_000,
            usage_limit: Some(1),
            per_user_limit: None,
            used_count: 0,
            is_active: true,
            created_at: now_millis(),
        })
        .await
        .unwrap();

    // Stored uppercase, found case-insensitively
    assert_eq!(coupon.code, "WELCOME10");
    let found = coupons
        .find_by_code(&tenant_id, "welcome10")
        .await
        .unwrap()
        .expect("coupon by code");

    let discount = pricing::evaluate(&found, 40.0, 0, now_millis()).unwrap();
    assert_eq!(discount.discount_amount, 4.0);
    assert_eq!(discount.total_amount, 36.0);

    let coupon_id = found.id.as_ref().unwrap().to_string();
    coupons.increment_usage(&coupon_id).await.unwrap();

    let used_up = coupons.find_by_id(&coupon_id).await.unwrap().unwrap();
    assert_eq!(used_up.used_count, 1);
    assert!(pricing::evaluate(&used_up, 40.0, 0, now_millis()).is_err());
}

#[tokio::test]
async fn per_user_usage_is_counted_from_bookings() {
    let db = setup().await;
    let tenant = seed_tenant(&db).await;
    let listing = seed_listing(&db, &tenant, 5).await;

    let bookings = BookingRepository::new(db.db.clone());
    let mut with_coupon = make_booking(&listing, "u1", "09:00", "10:00", BookingStatus::Confirmed);
    with_coupon.coupon_code = Some("SPRING".to_string());
    bookings.create(with_coupon).await.unwrap();

    // A cancelled redemption does not count
    let mut cancelled = make_booking(&listing, "u1", "10:00", "11:00", BookingStatus::Cancelled);
    cancelled.coupon_code = Some("SPRING".to_string());
    bookings.create(cancelled).await.unwrap();

    assert_eq!(bookings.coupon_usage_for_customer("u1", "SPRING").await.unwrap(), 1);
    assert_eq!(bookings.coupon_usage_for_customer("u2", "SPRING").await.unwrap(), 0);
}

#[tokio::test]
async fn stale_pending_bookings_expire() {
    let db = setup().await;
    let tenant = seed_tenant(&db).await;
    let listing = seed_listing(&db, &tenant, 1).await;

    let bookings = BookingRepository::new(db.db.clone());
    let mut stale = make_booking(&listing, "u1", "09:00", "10:00", BookingStatus::Pending);
    stale.created_at = now_millis() - 3_600_000; // 1h old
    let stale = bookings.create(stale).await.unwrap();

    let fresh = bookings
        .create(make_booking(&listing, "u2", "10:00", "11:00", BookingStatus::Pending))
        .await
        .unwrap();

    let cutoff = now_millis() - 30 * 60_000;
    let expired = bookings.expire_pending_before(cutoff).await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].reference, stale.reference);
    assert_eq!(expired[0].status, BookingStatus::Cancelled);

    let fresh_after = bookings
        .find_by_id(&fresh.id.as_ref().unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fresh_after.status, BookingStatus::Pending);
}

#[tokio::test]
async fn duplicate_email_and_coupon_code_are_rejected() {
    let db = setup().await;
    let tenant = seed_tenant(&db).await;

    let users = UserRepository::new(db.db.clone());
    users
        .create(UserCreate {
            email: "Ana@Example.com".to_string(),
            password: "correct horse battery".to_string(),
            display_name: "Ana".to_string(),
            role: UserRole::Customer,
            tenant: None,
        })
        .await
        .unwrap();

    // Same address, different case
    let duplicate = users
        .create(UserCreate {
            email: "ana@example.com".to_string(),
            password: "another password!".to_string(),
            display_name: "Ana 2".to_string(),
            role: UserRole::Customer,
            tenant: None,
        })
        .await;
    assert!(matches!(duplicate, Err(RepoError::Duplicate(_))));

    let coupons = CouponRepository::new(db.db.clone());
    let template = Coupon {
        id: None,
        tenant: tenant.id.clone().unwrap(),
        code: "TWICE".to_string(),
        description: None,
        discount_type: DiscountType::FixedAmount,
        value: 5.0,
        min_order_amount: None,
        max_discount_amount: None,
        valid_from: 0,
        valid_until: now_millis() + 86_400_000,
        usage_limit: None,
        per_user_limit: None,
        used_count: 0,
        is_active: true,
        created_at: now_millis(),
    };
    coupons.create(template.clone()).await.unwrap();
    assert!(matches!(
        coupons.create(template).await,
        Err(RepoError::Duplicate(_))
    ));
}

#[tokio::test]
async fn on_disk_database_stores_and_reads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plaza.db");

    let db = DbService::new(&path.to_string_lossy())
        .await
        .expect("open on-disk db");
    seed_tenant(&db).await;

    let tenants = TenantRepository::new(db.db.clone())
        .find_all()
        .await
        .unwrap();
    assert_eq!(tenants.len(), 1);
    assert_eq!(tenants[0].name, "Riverside Sports");
}

#[tokio::test]
async fn booking_transition_matrix_is_enforced_by_shared_types() {
    // The handlers gate on these; pin the matrix here next to the flow
    assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
    assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::NoShow));
    assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Pending));
}
