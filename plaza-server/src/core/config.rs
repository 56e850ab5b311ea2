//! Server configuration
//!
//! All settings load from environment variables with defaults:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/plaza/server | working directory (db, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development / staging / production |
//! | BOOKING_HOLD_MINUTES | 30 | pending-booking expiry window |
//! | LOG_RETENTION_DAYS | 14 | rolled log files kept on disk |
//! | LOG_LEVEL | info | default tracing filter (RUST_LOG wins) |
//! | JWT_SECRET / JWT_* | - | see [`crate::auth::JwtConfig`] |

use std::path::PathBuf;

use crate::auth::JwtConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Minutes a pending booking holds its window before the sweep
    /// cancels it
    pub booking_hold_minutes: i64,
    /// Days of rolled log files to keep
    pub log_retention_days: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/plaza/server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            booking_hold_minutes: std::env::var("BOOKING_HOLD_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            log_retention_days: std::env::var("LOG_RETENTION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(14),
        }
    }

    /// Override work_dir and port (test scenarios)
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// `work_dir/database` - embedded database files
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// `work_dir/logs` - rolled log files
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work_dir layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Prepare the process environment: dotenv, work_dir layout, logging.
///
/// Must run before [`Config`]-dependent services start.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let logs_dir = config.logs_dir();
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    crate::utils::logger::init_logger_with_file(Some(&level), logs_dir.to_str());

    if let Some(dir) = logs_dir.to_str()
        && let Err(e) = crate::utils::logger::cleanup_old_logs(dir, config.log_retention_days)
    {
        tracing::warn!(error = %e, "Log cleanup failed");
    }

    Ok(())
}
