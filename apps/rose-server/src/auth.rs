//! # Admin Authentication
//!
//! Email + password sign-in for the browser back office, JWT access
//! tokens, and the [`RequireAdmin`] extractor guarding the admin routes.
//!
//! ## Sign-in Flow
//! ```text
//! POST /api/auth/sign-in { email, password }
//!      │
//!      ├── find_by_email (case-insensitive) ── none ──► 401 "Credenciales incorrectas"
//!      ├── verify_password (argon2)         ── bad  ──► 401 "Credenciales incorrectas"
//!      │
//!      ├── jti = uuid v4
//!      ├── admin_sessions row { id: jti, expires_at }
//!      ├── JWT { sub: admin id, email, jti, exp }
//!      └── broadcast AuthEvent::SignedIn ──► /api/auth/events subscribers
//! ```
//!
//! Every admin request re-checks the session row, so signing out revokes
//! the token immediately rather than at expiry.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rose_db::{verify_password, AdminUser, DbError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are not distinguished.
    #[error("Credenciales incorrectas")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token is well formed but its session was signed out or expired.
    #[error("Session is no longer active")]
    SessionRevoked,

    #[error("Failed to issue token: {0}")]
    TokenIssue(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

// =============================================================================
// JWT
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin user id)
    pub sub: String,

    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID, also the admin_sessions primary key
    pub jti: String,
}

/// A freshly issued access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    access_lifetime_secs: i64,
}

impl JwtManager {
    pub fn new(secret: impl Into<String>, access_lifetime_secs: i64) -> Self {
        JwtManager {
            secret: secret.into(),
            access_lifetime_secs,
        }
    }

    /// Issues an access token for an admin, starting at `now`.
    pub fn issue(&self, admin: &AdminUser, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        // JWT timestamps are whole seconds
        let issued_at = Utc
            .timestamp_opt(now.timestamp(), 0)
            .single()
            .ok_or_else(|| AuthError::TokenIssue("timestamp out of range".into()))?;
        let expires_at = issued_at + Duration::seconds(self.access_lifetime_secs);
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: admin.id.to_string(),
            email: admin.email.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: jti.clone(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        Ok(IssuedToken {
            token,
            jti,
            issued_at,
            expires_at,
        })
    }

    /// Validate and decode a token (signature and expiry).
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
}

// =============================================================================
// Auth Events
// =============================================================================

/// Sign-in state changes, pushed to `/api/auth/events` subscribers so an
/// open back office can react to a sign-out from another tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    #[serde(rename_all = "camelCase")]
    SignedIn { admin_id: i64, email: String },

    #[serde(rename_all = "camelCase")]
    SignedOut { admin_id: i64, email: String },
}

// =============================================================================
// Sign-in / Sign-out
// =============================================================================

/// Result of a successful sign-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedIn {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub admin_id: i64,
    pub email: String,
}

/// Checks credentials, records a session and issues its token.
pub async fn sign_in(state: &AppState, email: &str, password: &str) -> Result<SignedIn, AuthError> {
    let admins = state.db.admins();

    let Some(admin) = admins.find_by_email(email).await? else {
        debug!("Sign-in for unknown email");
        return Err(AuthError::InvalidCredentials);
    };
    if !verify_password(password, &admin.password_hash) {
        warn!(admin_id = admin.id, "Sign-in with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let issued = state.jwt.issue(&admin, Utc::now())?;
    admins
        .create_session(&issued.jti, admin.id, issued.issued_at, issued.expires_at)
        .await?;

    info!(admin_id = admin.id, "Admin signed in");
    state.publish(AuthEvent::SignedIn {
        admin_id: admin.id,
        email: admin.email.clone(),
    });

    Ok(SignedIn {
        token: issued.token,
        expires_at: issued.expires_at,
        admin_id: admin.id,
        email: admin.email,
    })
}

/// Revokes the caller's session.
pub async fn sign_out(state: &AppState, admin: &AdminContext) -> Result<(), AuthError> {
    if state.db.admins().revoke_session(&admin.session_id, Utc::now()).await? {
        info!(admin_id = admin.admin_id, "Admin signed out");
        state.publish(AuthEvent::SignedOut {
            admin_id: admin.admin_id,
            email: admin.email.clone(),
        });
    }
    Ok(())
}

// =============================================================================
// Extractor
// =============================================================================

/// The signed-in admin behind a request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminContext {
    pub admin_id: i64,
    pub email: String,
    #[serde(skip)]
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Extractor that requires a valid, non-revoked admin session.
///
/// ```rust,ignore
/// async fn handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hola, {}", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub AdminContext);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or(AuthError::MissingToken)?;

        let claims = state.jwt.validate_token(token)?;
        let admin_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("bad subject".into()))?;

        let session = state
            .db
            .admins()
            .get_active_session(&claims.jti, Utc::now())
            .await
            .map_err(AuthError::from)?
            .ok_or(AuthError::SessionRevoked)?;

        if session.admin_id != admin_id {
            return Err(AuthError::InvalidToken("session mismatch".into()).into());
        }

        Ok(RequireAdmin(AdminContext {
            admin_id,
            email: claims.email,
            session_id: session.id,
            expires_at: session.expires_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminUser {
        AdminUser {
            id: 3,
            email: "owner@rose.co".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", 3600);
        let issued = manager.issue(&admin(), Utc::now()).unwrap();

        let claims = manager.validate_token(&issued.token).unwrap();
        assert_eq!(claims.sub, "3");
        assert_eq!(claims.email, "owner@rose.co");
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = JwtManager::new("secret-a", 3600).issue(&admin(), Utc::now()).unwrap();
        let err = JwtManager::new("secret-b", 3600)
            .validate_token(&issued.token)
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new("test-secret", 60);
        let issued = manager
            .issue(&admin(), Utc::now() - Duration::hours(2))
            .unwrap();
        assert!(manager.validate_token(&issued.token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }

    #[test]
    fn test_auth_event_wire_format() {
        let event = AuthEvent::SignedOut {
            admin_id: 1,
            email: "owner@rose.co".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "SIGNED_OUT");
        assert_eq!(json["adminId"], 1);
    }
}
