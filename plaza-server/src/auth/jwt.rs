//! JWT token service
//!
//! Token generation, validation and the per-request user context.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, generating temporary key", e);
                    generate_printable_jwt_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 24h
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "plaza-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "plaza-clients".to_string()),
        }
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject)
    pub sub: String,
    pub email: String,
    /// Role name: admin | tenant_admin | customer
    pub role: String,
    /// Tenant binding for tenant-admin accounts
    #[serde(default)]
    pub tenant: Option<String>,
    /// Comma-separated permission list
    pub permissions: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Generate a printable 64-char secret (development fallback)
pub fn generate_printable_jwt_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut key = String::with_capacity(64);

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            // Random generation failed; fall back to a fixed dev-only key
            return "PlazaServerDevelopmentOnlyKey-ReplaceInProduction!".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }

    key
}

/// Load the JWT secret from the environment
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => Err(JwtError::ConfigError(
            "JWT_SECRET environment variable not set".to_string(),
        )),
    }
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create with default (env-derived) configuration
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// Create with an explicit configuration
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate a token for a user
    pub fn generate_token(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
        tenant: Option<&str>,
        permissions: &[String],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            tenant: tenant.map(|t| t.to_string()),
            permissions: permissions.join(","),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an Authorization header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Current user context (parsed from JWT claims)
///
/// Created by the auth middleware and injected into request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    /// Role name: admin | tenant_admin | customer
    pub role: String,
    /// Tenant binding for tenant-admin accounts
    pub tenant_id: Option<String>,
    pub permissions: Vec<String>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        let permissions = if claims.permissions.is_empty() {
            vec![]
        } else {
            claims
                .permissions
                .split(',')
                .map(|s| s.to_string())
                .collect()
        };

        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
            tenant_id: claims.tenant,
            permissions,
        }
    }
}

impl CurrentUser {
    /// Platform operators (`role == "admin"`) hold every permission
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// The caller's tenant id, or an error when the account has no binding.
    ///
    /// Tenant-scoped handlers use this to filter every query.
    pub fn require_tenant(&self) -> Result<&str, crate::utils::AppError> {
        self.tenant_id
            .as_deref()
            .ok_or_else(|| crate::utils::AppError::forbidden("No tenant bound to this account"))
    }

    /// Check a permission, with wildcard support:
    /// - `"listings:*"` matches `"listings:manage"`, `"listings:read"`, ...
    /// - `"all"` matches everything
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        if self.permissions.contains(&"all".to_string()) {
            return true;
        }

        self.permissions.iter().any(|p| {
            if p == permission {
                return true;
            }
            if let Some(prefix) = p.strip_suffix(":*") {
                permission.starts_with(&format!("{}:", prefix))
            } else {
                false
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-test-secret-test-secret!".to_string(),
            expiration_minutes: 60,
            issuer: "plaza-server".to_string(),
            audience: "plaza-clients".to_string(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = test_service();
        let permissions = vec!["listings:manage".to_string(), "coupons:manage".to_string()];

        let token = service
            .generate_token(
                "user:123",
                "owner@example.com",
                "tenant_admin",
                Some("tenant:abc"),
                &permissions,
            )
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "user:123");
        assert_eq!(claims.email, "owner@example.com");
        assert_eq!(claims.role, "tenant_admin");
        assert_eq!(claims.tenant.as_deref(), Some("tenant:abc"));

        let user = CurrentUser::from(claims);
        assert_eq!(user.permissions.len(), 2);
        assert_eq!(user.require_tenant().unwrap(), "tenant:abc");
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let token = service
            .generate_token("user:1", "a@b.c", "customer", None, &[])
            .unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn test_permission_wildcard_matching() {
        let user = CurrentUser {
            id: "user:1".to_string(),
            email: "a@b.c".to_string(),
            role: "tenant_admin".to_string(),
            tenant_id: Some("tenant:1".to_string()),
            permissions: vec!["listings:*".to_string(), "reports:view".to_string()],
        };

        assert!(user.has_permission("listings:manage"));
        assert!(user.has_permission("listings:read"));
        assert!(user.has_permission("reports:view"));
        assert!(!user.has_permission("coupons:manage"));
    }

    #[test]
    fn test_admin_has_all_permissions() {
        let user = CurrentUser {
            id: "user:1".to_string(),
            email: "ops@plaza".to_string(),
            role: "admin".to_string(),
            tenant_id: None,
            permissions: vec![],
        };
        assert!(user.has_permission("tenants:manage"));
        assert!(user.has_permission("anything:at_all"));
    }
}
