//! Permission Definitions
//!
//! Simplified RBAC. Roles are fixed (admin / tenant_admin / customer);
//! each role maps to a default permission set baked into the JWT at
//! login. Wildcard matching lives on [`crate::auth::CurrentUser`].

use shared::UserRole;

/// Tenant dashboard permissions
pub const TENANT_ADMIN_PERMISSIONS: &[&str] = &[
    "listings:manage",  // listing CRUD
    "slots:manage",     // blocked-window management
    "bookings:manage",  // booking list + status transitions
    "coupons:manage",   // coupon CRUD
    "templates:manage", // notification template overrides
    "reports:view",     // dashboard counters
    "notifications:read",
];

/// Customer permissions
pub const CUSTOMER_PERMISSIONS: &[&str] = &[
    "bookings:create",
    "notifications:read",
];

/// Platform operator permissions (super-admin console)
pub const ADMIN_PERMISSIONS: &[&str] = &["all"];

/// Get default permissions for a role
pub fn default_permissions(role: UserRole) -> Vec<String> {
    let set = match role {
        UserRole::Admin => ADMIN_PERMISSIONS,
        UserRole::TenantAdmin => TENANT_ADMIN_PERMISSIONS,
        UserRole::Customer => CUSTOMER_PERMISSIONS,
    };
    set.iter().map(|s| s.to_string()).collect()
}
