//! Plaza Booking Server - multi-tenant booking marketplace backend
//!
//! # Architecture overview
//!
//! - **HTTP API** (`api`): RESTful routes for browsing, booking, the
//!   tenant dashboard and the platform console
//! - **Database** (`db`): embedded SurrealDB documents + repositories
//! - **Auth** (`auth`): JWT + Argon2, role-based permissions
//! - **Availability** (`availability`): slot window generation
//! - **Pricing** (`pricing`): coupon discount evaluation
//! - **Notifications** (`notify`): template rendering + channel fan-out
//!
//! # Module structure
//!
//! ```text
//! plaza-server/src/
//! ├── core/          # config, state, server lifecycle, tasks
//! ├── auth/          # JWT auth, permissions, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models + repositories
//! ├── availability/  # slot window generation
//! ├── pricing/       # coupon evaluation
//! ├── notify/        # notification dispatch
//! ├── services/      # http serve loop, first-boot seeding
//! └── utils/         # errors, logging, validation, time
//! ```

pub mod api;
pub mod auth;
pub mod availability;
pub mod core;
pub mod db;
pub mod notify;
pub mod pricing;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState, setup_environment};
pub use notify::NotificationService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

// Security logging macro - structured auth events under the `security`
// target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____  __
   / __ \/ /___ _____  ____ _
  / /_/ / / __ `/_  / / __ `/
 / ____/ / /_/ / / /_/ /_/ /
/_/   /_/\__,_/ /___/\__,_/
    "#
    );
}
