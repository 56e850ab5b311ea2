//! Database Module
//!
//! Embedded SurrealDB storage. Records are plain documents addressed by
//! `RecordId`; the repository layer provides the CRUD mapping.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "plaza";
const DATABASE: &str = "plaza";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::initialize(db).await
    }

    /// Open an in-memory database (tests and ephemeral runs)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::initialize(db).await
    }

    async fn initialize(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        bootstrap_schema(&db).await?;

        tracing::info!("Database connection established (SurrealDB embedded)");
        Ok(Self { db })
    }
}

/// Define the uniqueness indexes the repositories rely on.
///
/// Statements are idempotent (`IF NOT EXISTS`) so this runs on every boot.
async fn bootstrap_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    const STATEMENTS: &[&str] = &[
        "DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE",
        "DEFINE INDEX IF NOT EXISTS coupon_tenant_code ON TABLE coupon COLUMNS tenant, code UNIQUE",
        "DEFINE INDEX IF NOT EXISTS booking_listing_date ON TABLE booking COLUMNS listing, date",
        "DEFINE INDEX IF NOT EXISTS notification_recipient ON TABLE notification COLUMNS recipient",
    ];

    for stmt in STATEMENTS {
        db.query(*stmt)
            .await
            .map_err(|e| AppError::database(format!("Schema bootstrap failed: {e}")))?;
    }
    Ok(())
}
