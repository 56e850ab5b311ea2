//! Slot Repository (tenant-blocked windows)

use super::{BaseRepository, RepoError, RepoResult, record_id, record_ref};
use crate::db::models::Slot;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "slot";

#[derive(Clone)]
pub struct SlotRepository {
    base: BaseRepository,
}

impl SlotRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Blocked windows for a listing on a given date
    pub async fn find_by_listing_date(
        &self,
        listing_id: &str,
        date: &str,
    ) -> RepoResult<Vec<Slot>> {
        let slots: Vec<Slot> = self
            .base
            .db()
            .query("SELECT * FROM slot WHERE listing = $listing AND date = $date ORDER BY start")
            .bind(("listing", record_ref("listing", listing_id)))
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(slots)
    }

    /// All blocked windows for a listing (dashboard view)
    pub async fn find_by_listing(&self, listing_id: &str) -> RepoResult<Vec<Slot>> {
        let slots: Vec<Slot> = self
            .base
            .db()
            .query("SELECT * FROM slot WHERE listing = $listing ORDER BY date, start")
            .bind(("listing", record_ref("listing", listing_id)))
            .await?
            .take(0)?;
        Ok(slots)
    }

    /// Find blocked window by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Slot>> {
        let slot: Option<Slot> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(slot)
    }

    /// Create a blocked window
    pub async fn create(&self, slot: Slot) -> RepoResult<Slot> {
        let created: Option<Slot> = self.base.db().create(TABLE).content(slot).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create slot".to_string()))
    }

    /// Remove a blocked window
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let _: Option<Slot> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(true)
    }
}
