//! Client-related types shared between server and client
//!
//! Common request/response types used in API communication.

use serde::{Deserialize, Serialize};

// Re-export ApiResponse from response module
pub use crate::response::ApiResponse;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Customer self-registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Tenant registration request
///
/// Creates the tenant record (status `pending`) together with its first
/// tenant-admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTenantRequest {
    pub tenant_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub email: String,
    pub password: String,
    pub display_name: String,
}
