//! User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::UserRole;
use surrealdb::RecordId;

/// User ID type
pub type UserId = RecordId;

/// User model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: UserRole,
    /// Tenant binding for tenant-admin accounts
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub tenant: Option<RecordId>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create user payload (password is hashed by the repository)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: UserRole,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub tenant: Option<RecordId>,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hash = User::hash_password("correct horse battery").unwrap();
        let user = User {
            id: None,
            email: "a@b.c".to_string(),
            display_name: "A".to_string(),
            hash_pass: hash,
            role: UserRole::Customer,
            tenant: None,
            is_active: true,
            created_at: 0,
        };
        assert!(user.verify_password("correct horse battery").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }
}
