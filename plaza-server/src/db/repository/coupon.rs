//! Coupon Repository

use super::{BaseRepository, RepoError, RepoResult, record_id, record_ref};
use crate::db::models::{Coupon, CouponUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "coupon";

#[derive(Clone)]
pub struct CouponRepository {
    base: BaseRepository,
}

impl CouponRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// A tenant's coupons, newest first
    pub async fn find_by_tenant(&self, tenant_id: &str) -> RepoResult<Vec<Coupon>> {
        let coupons: Vec<Coupon> = self
            .base
            .db()
            .query("SELECT * FROM coupon WHERE tenant = $tenant ORDER BY created_at DESC")
            .bind(("tenant", record_ref("tenant", tenant_id)))
            .await?
            .take(0)?;
        Ok(coupons)
    }

    /// Find coupon by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Coupon>> {
        let coupon: Option<Coupon> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(coupon)
    }

    /// Find coupon by tenant + code (codes are stored uppercase)
    pub async fn find_by_code(&self, tenant_id: &str, code: &str) -> RepoResult<Option<Coupon>> {
        let code = code.trim().to_uppercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM coupon WHERE tenant = $tenant AND code = $code LIMIT 1")
            .bind(("tenant", record_ref("tenant", tenant_id)))
            .bind(("code", code))
            .await?;
        let coupons: Vec<Coupon> = result.take(0)?;
        Ok(coupons.into_iter().next())
    }

    /// Create a coupon
    pub async fn create(&self, mut coupon: Coupon) -> RepoResult<Coupon> {
        coupon.code = coupon.code.trim().to_uppercase();

        let tenant_id = coupon.tenant.to_string();
        if self.find_by_code(&tenant_id, &coupon.code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Coupon '{}' already exists",
                coupon.code
            )));
        }

        let created: Option<Coupon> = self.base.db().create(TABLE).content(coupon).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create coupon".to_string()))
    }

    /// Update a coupon (code itself is immutable)
    pub async fn update(&self, id: &str, data: CouponUpdate) -> RepoResult<Coupon> {
        let rid = record_id(TABLE, id);
        let updated: Option<Coupon> = self.base.db().update(rid).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Coupon {} not found", id)))
    }

    /// Record one redemption
    pub async fn increment_usage(&self, id: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $coupon SET used_count += 1")
            .bind(("coupon", record_id(TABLE, id)))
            .await?;
        Ok(())
    }

    /// Hard delete a coupon
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let _: Option<Coupon> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(true)
    }
}
