//! Authentication and authorization
//!
//! JWT auth, role-based permissions and the Axum middleware:
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - per-request user context
//! - [`require_auth`] - authentication middleware
//! - [`require_permission`] / [`require_admin`] - authorization middleware

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_permission};
pub use permissions::default_permissions;
