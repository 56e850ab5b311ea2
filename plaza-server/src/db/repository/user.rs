//! User Repository

use super::{BaseRepository, CountRow, RepoError, RepoResult, record_id};
use crate::db::models::{User, UserCreate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(user)
    }

    /// Find user by email (emails are stored lowercase)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a user, hashing the password.
    ///
    /// Uses an explicit CREATE..SET statement because `hash_pass` is
    /// marked skip_serializing on the model (it must never leak into API
    /// responses) and would be dropped by a `.content()` insert.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let email = data.email.trim().to_lowercase();

        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Account '{}' already exists",
                email
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    email = $email,
                    display_name = $display_name,
                    hash_pass = $hash_pass,
                    role = $role,
                    tenant = $tenant,
                    is_active = true,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("email", email))
            .bind(("display_name", data.display_name))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            // Reference fields are stored as "table:id" strings
            .bind(("tenant", data.tenant.map(|t| t.to_string())))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Total user count (platform overview)
    pub async fn count(&self) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() FROM user GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }
}
