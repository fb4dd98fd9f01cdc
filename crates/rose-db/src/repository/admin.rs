//! # Admin Repository
//!
//! Admin accounts for the browser back office, their sessions, and the
//! Argon2id password hashes.
//!
//! ## Session Model
//! ```text
//! sign-in ──► admin_sessions row { id = token jti, expires_at }
//!                │
//!                ├── every admin request: row exists, not revoked, not expired
//!                │
//!                └── sign-out: revoked_at = now
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::to_db_timestamp;

// =============================================================================
// Rows
// =============================================================================

/// An admin account.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A signed-in admin session; the id is the access token's `jti`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AdminSession {
    pub id: String,
    pub admin_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl AdminSession {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbError::Internal(format!("password hash failed: {e}")))
}

/// Checks a password against a stored hash. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Repository
// =============================================================================

#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: SqlitePool,
}

impl AdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AdminRepository { pool }
    }

    /// Creates an account from an already hashed password.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - email already registered (any case)
    pub async fn create_user(&self, email: &str, password_hash: &str) -> DbResult<AdminUser> {
        let email = email.trim();
        debug!(email = %email, "Creating admin user");

        let user = sqlx::query_as::<_, AdminUser>(
            "INSERT INTO admin_users (email, password_hash) VALUES (?1, ?2) \
             RETURNING id, email, password_hash, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("email", email),
            other => other,
        })?;

        info!(admin_id = user.id, "Admin user created");
        Ok(user)
    }

    /// Case-insensitive lookup.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<AdminUser>> {
        let user = sqlx::query_as::<_, AdminUser>(
            "SELECT id, email, password_hash, created_at FROM admin_users WHERE email = ?1",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> DbResult<Option<AdminUser>> {
        let user = sqlx::query_as::<_, AdminUser>(
            "SELECT id, email, password_hash, created_at FROM admin_users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn count_users(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Records a new session.
    pub async fn create_session(
        &self,
        id: &str,
        admin_id: i64,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> DbResult<AdminSession> {
        let session = sqlx::query_as::<_, AdminSession>(
            "INSERT INTO admin_sessions (id, admin_id, created_at, expires_at) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING id, admin_id, created_at, expires_at, revoked_at",
        )
        .bind(id)
        .bind(admin_id)
        .bind(to_db_timestamp(&created_at))
        .bind(to_db_timestamp(&expires_at))
        .fetch_one(&self.pool)
        .await?;

        debug!(session_id = %id, admin_id, "Admin session created");
        Ok(session)
    }

    /// The session if it exists, is not revoked and has not expired at `now`.
    pub async fn get_active_session(&self, id: &str, now: DateTime<Utc>) -> DbResult<Option<AdminSession>> {
        let session = sqlx::query_as::<_, AdminSession>(
            "SELECT id, admin_id, created_at, expires_at, revoked_at FROM admin_sessions \
             WHERE id = ?1 AND revoked_at IS NULL AND expires_at > ?2",
        )
        .bind(id)
        .bind(to_db_timestamp(&now))
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Revokes a session. Returns whether an active session was revoked.
    pub async fn revoke_session(&self, id: &str, now: DateTime<Utc>) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE admin_sessions SET revoked_at = ?2 WHERE id = ?1 AND revoked_at IS NULL",
        )
        .bind(id)
        .bind(to_db_timestamp(&now))
        .execute(&self.pool)
        .await?;

        let revoked = result.rows_affected() > 0;
        if revoked {
            info!(session_id = %id, "Admin session revoked");
        }
        Ok(revoked)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
