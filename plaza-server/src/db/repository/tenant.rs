//! Tenant Repository

use super::{BaseRepository, CountRow, RepoError, RepoResult, record_id};
use crate::db::models::Tenant;
use shared::TenantStatus;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "tenant";

#[derive(Clone)]
pub struct TenantRepository {
    base: BaseRepository,
}

impl TenantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all tenants ordered by creation time (newest first)
    pub async fn find_all(&self) -> RepoResult<Vec<Tenant>> {
        let tenants: Vec<Tenant> = self
            .base
            .db()
            .query("SELECT * FROM tenant ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(tenants)
    }

    /// Find tenants by status
    pub async fn find_by_status(&self, status: TenantStatus) -> RepoResult<Vec<Tenant>> {
        let tenants: Vec<Tenant> = self
            .base
            .db()
            .query("SELECT * FROM tenant WHERE status = $status ORDER BY created_at DESC")
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(tenants)
    }

    /// Find tenant by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Tenant>> {
        let tenant: Option<Tenant> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(tenant)
    }

    /// Create a new tenant (status `pending`)
    pub async fn create(&self, mut tenant: Tenant) -> RepoResult<Tenant> {
        tenant.id = None;
        tenant.created_at = now_millis();

        let created: Option<Tenant> = self.base.db().create(TABLE).content(tenant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create tenant".to_string()))
    }

    /// Set the owner account after the first tenant-admin user exists
    pub async fn set_owner(&self, id: &str, owner: surrealdb::RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $tenant SET owner = $owner")
            .bind(("tenant", record_id(TABLE, id)))
            // Reference fields are stored as "table:id" strings
            .bind(("owner", owner.to_string()))
            .await?;
        Ok(())
    }

    /// Update tenant status (console transition)
    pub async fn update_status(&self, id: &str, status: TenantStatus) -> RepoResult<Tenant> {
        self.base
            .db()
            .query("UPDATE $tenant SET status = $status")
            .bind(("tenant", record_id(TABLE, id)))
            .bind(("status", status))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Tenant {} not found", id)))
    }

    /// Total tenant count (platform overview)
    pub async fn count(&self) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() FROM tenant GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }
}
