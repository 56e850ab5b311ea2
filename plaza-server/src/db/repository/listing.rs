//! Listing Repository

use super::{BaseRepository, CountRow, RepoError, RepoResult, record_id, record_ref};
use crate::db::models::{Listing, ListingUpdate};
use shared::ListingCategory;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "listing";

#[derive(Clone)]
pub struct ListingRepository {
    base: BaseRepository,
}

impl ListingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Public browse: active + approved listings, optionally filtered
    /// by category and city (city match is case-insensitive).
    pub async fn find_public(
        &self,
        category: Option<ListingCategory>,
        city: Option<String>,
    ) -> RepoResult<Vec<Listing>> {
        let mut sql = String::from(
            "SELECT * FROM listing WHERE is_active = true AND is_approved = true",
        );
        if category.is_some() {
            sql.push_str(" AND category = $category");
        }
        if city.is_some() {
            sql.push_str(" AND string::lowercase(city) = $city");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.base.db().query(sql);
        if let Some(category) = category {
            query = query.bind(("category", category));
        }
        if let Some(city) = city {
            query = query.bind(("city", city.to_lowercase()));
        }

        let listings: Vec<Listing> = query.await?.take(0)?;
        Ok(listings)
    }

    /// All listings belonging to a tenant (dashboard view)
    pub async fn find_by_tenant(&self, tenant_id: &str) -> RepoResult<Vec<Listing>> {
        let listings: Vec<Listing> = self
            .base
            .db()
            .query("SELECT * FROM listing WHERE tenant = $tenant ORDER BY created_at DESC")
            .bind(("tenant", record_ref("tenant", tenant_id)))
            .await?
            .take(0)?;
        Ok(listings)
    }

    /// Find listing by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Listing>> {
        let listing: Option<Listing> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(listing)
    }

    /// Create a new listing
    pub async fn create(&self, listing: Listing) -> RepoResult<Listing> {
        let created: Option<Listing> = self.base.db().create(TABLE).content(listing).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create listing".to_string()))
    }

    /// Update a listing (merge semantics; absent fields stay untouched)
    pub async fn update(&self, id: &str, data: ListingUpdate) -> RepoResult<Listing> {
        let rid = record_id(TABLE, id);
        let updated: Option<Listing> = self.base.db().update(rid).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Listing {} not found", id)))
    }

    /// Set the platform moderation flag
    pub async fn set_approval(&self, id: &str, is_approved: bool) -> RepoResult<Listing> {
        self.base
            .db()
            .query("UPDATE $listing SET is_approved = $approved")
            .bind(("listing", record_id(TABLE, id)))
            .bind(("approved", is_approved))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Listing {} not found", id)))
    }

    /// Hard delete a listing
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let _: Option<Listing> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(true)
    }

    /// Total listing count (platform overview)
    pub async fn count(&self) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() FROM listing GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }
}
