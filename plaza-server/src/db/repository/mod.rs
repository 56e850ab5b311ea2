//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Accounts
pub mod tenant;
pub mod user;

// Inventory
pub mod listing;
pub mod slot;

// Bookings
pub mod booking;
pub mod coupon;

// Notifications
pub mod notification;
pub mod notification_template;

// Re-exports
pub use booking::BookingRepository;
pub use coupon::CouponRepository;
pub use listing::ListingRepository;
pub use notification::NotificationRepository;
pub use notification_template::NotificationTemplateRepository;
pub use slot::SlotRepository;
pub use tenant::TenantRepository;
pub use user::UserRepository;

use serde::Deserialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings on the wire, RecordId internally
// =============================================================================

/// Build a RecordId for `table`, accepting either "table:key" or a bare key.
///
/// Use for primary-key operations (select/update/delete by id).
pub fn record_id(table: &str, id: &str) -> RecordId {
    let key = id
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id);
    RecordId::from_table_key(table, key)
}

/// Canonical "table:id" string for record-reference FIELDS.
///
/// Reference fields are stored as strings (see
/// `models::serde_helpers::record_id`), so WHERE comparisons must bind
/// the same string form, never a native RecordId.
pub fn record_ref(table: &str, id: &str) -> String {
    record_id(table, id).to_string()
}

/// Row shape for `SELECT count() ... GROUP ALL`
#[derive(Debug, Deserialize)]
pub(crate) struct CountRow {
    pub count: i64,
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_both_forms() {
        let a = record_id("listing", "abc123");
        let b = record_id("listing", "listing:abc123");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "listing:abc123");
    }

    #[test]
    fn test_record_ref_matches_serialized_form() {
        // Must equal what serde_helpers::record_id writes into documents
        assert_eq!(record_ref("tenant", "abc"), "tenant:abc");
        assert_eq!(record_ref("tenant", "tenant:abc"), "tenant:abc");
    }
}
