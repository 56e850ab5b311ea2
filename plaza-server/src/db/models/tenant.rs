//! Tenant Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::TenantStatus;
use surrealdb::RecordId;

/// Tenant ID type
pub type TenantId = RecordId;

/// Tenant model matching SurrealDB schema
///
/// A tenant is a business account owning listings on the platform. New
/// tenants start in `pending` status and are moderated from the platform
/// console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<TenantId>,
    pub name: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    /// First tenant-admin account, set at registration
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub owner: Option<RecordId>,
    pub status: TenantStatus,
    #[serde(default)]
    pub created_at: i64,
}

/// Console status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantStatusUpdate {
    pub status: TenantStatus,
}
