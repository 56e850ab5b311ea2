//! Booking Repository

use super::{BaseRepository, CountRow, RepoError, RepoResult, record_id, record_ref};
use crate::db::models::Booking;
use shared::BookingStatus;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "booking";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let booking: Option<Booking> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(booking)
    }

    /// A customer's bookings, newest first
    pub async fn find_by_customer(&self, customer_id: &str) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE customer = $customer ORDER BY created_at DESC")
            .bind(("customer", record_ref("user", customer_id)))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// A tenant's bookings, optionally filtered by status and date
    pub async fn find_by_tenant(
        &self,
        tenant_id: &str,
        status: Option<BookingStatus>,
        date: Option<String>,
    ) -> RepoResult<Vec<Booking>> {
        let mut sql = String::from("SELECT * FROM booking WHERE tenant = $tenant");
        if status.is_some() {
            sql.push_str(" AND status = $status");
        }
        if date.is_some() {
            sql.push_str(" AND date = $date");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("tenant", record_ref("tenant", tenant_id)));
        if let Some(status) = status {
            query = query.bind(("status", status));
        }
        if let Some(date) = date {
            query = query.bind(("date", date));
        }

        let bookings: Vec<Booking> = query.await?.take(0)?;
        Ok(bookings)
    }

    /// Bookings still occupying windows for a listing on a date
    /// (pending or confirmed)
    pub async fn find_occupying(&self, listing_id: &str, date: &str) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking \
                 WHERE listing = $listing AND date = $date \
                   AND status IN ['pending', 'confirmed'] \
                 ORDER BY start",
            )
            .bind(("listing", record_ref("listing", listing_id)))
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Create a new booking
    pub async fn create(&self, booking: Booking) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// Update booking status (transition checks happen in the handler)
    pub async fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
        note: Option<String>,
    ) -> RepoResult<Booking> {
        self.base
            .db()
            .query(
                "UPDATE $booking SET \
                    status = $status, \
                    note = $note OR note, \
                    updated_at = $now",
            )
            .bind(("booking", record_id(TABLE, id)))
            .bind(("status", status))
            .bind(("note", note))
            .bind(("now", now_millis()))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    /// How many non-cancelled bookings a customer has made with a coupon
    /// (per-user usage-limit check)
    pub async fn coupon_usage_for_customer(
        &self,
        customer_id: &str,
        code: &str,
    ) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query(
                "SELECT count() FROM booking \
                 WHERE customer = $customer AND coupon_code = $code \
                   AND status != 'cancelled' \
                 GROUP ALL",
            )
            .bind(("customer", record_ref("user", customer_id)))
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Cancel pending bookings created before `cutoff_ms`.
    ///
    /// Returns the expired bookings so callers can fan out notifications.
    pub async fn expire_pending_before(&self, cutoff_ms: i64) -> RepoResult<Vec<Booking>> {
        let expired: Vec<Booking> = self
            .base
            .db()
            .query(
                "UPDATE booking SET status = 'cancelled', updated_at = $now \
                 WHERE status = 'pending' AND created_at < $cutoff \
                 RETURN AFTER",
            )
            .bind(("now", now_millis()))
            .bind(("cutoff", cutoff_ms))
            .await?
            .take(0)?;
        Ok(expired)
    }

    /// Total booking count (platform overview)
    pub async fn count(&self) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() FROM booking GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }
}
