//! # Auth Routes
//!
//! ```text
//! POST /api/auth/sign-in    { email, password } ──► { token, expiresAt, adminId, email }
//! POST /api/auth/sign-out   (bearer)            ──► 204
//! GET  /api/auth/session    (bearer)            ──► { adminId, email, expiresAt }
//! GET  /api/auth/events                         ──► SSE: SIGNED_IN / SIGNED_OUT
//! ```

use std::convert::Infallible;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::auth::{self, AdminContext, RequireAdmin, SignedIn};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/session", get(session))
        .route("/events", get(events))
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

async fn sign_in(State(state): State<AppState>, Json(req): Json<SignInRequest>) -> ApiResult<Json<SignedIn>> {
    let signed_in = auth::sign_in(&state, &req.email, &req.password).await?;
    Ok(Json(signed_in))
}

async fn sign_out(State(state): State<AppState>, RequireAdmin(admin): RequireAdmin) -> ApiResult<StatusCode> {
    auth::sign_out(&state, &admin).await.map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn session(RequireAdmin(admin): RequireAdmin) -> Json<AdminContext> {
    Json(admin)
}

/// Streams sign-in state changes as Server-Sent Events.
async fn events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Auth event subscriber connected");
    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(|message| match message {
        Ok(event) => match Event::default().json_data(&event) {
            Ok(sse) => Some(Ok(sse)),
            Err(e) => {
                warn!(error = %e, "Failed to encode auth event");
                None
            }
        },
        // Lagged subscriber: skip the dropped events, keep streaming.
        Err(e) => {
            warn!(error = %e, "Auth event subscriber lagged");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use crate::routes::build_router;
    use crate::routes::test_support::*;
    use axum::http::{Method, StatusCode};
    use rose_core::surface::Surface;
    use serde_json::json;

    use crate::auth::AuthEvent;

    #[tokio::test]
    async fn test_wrong_password_is_generic() {
        let state = state_for(Surface::Browser).await;
        with_admin(&state).await;
        let router = build_router(state);

        for (email, password) in [(ADMIN_EMAIL, "nope"), ("ghost@rose.co", ADMIN_PASSWORD)] {
            let (status, body) = send(
                &router,
                Method::POST,
                "/api/auth/sign-in",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["message"], "Credenciales incorrectas");
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let state = state_for(Surface::Browser).await;
        with_admin(&state).await;
        let mut events = state.events.subscribe();
        let router = build_router(state);

        let token = sign_in(&router).await;
        assert!(matches!(events.recv().await.unwrap(), AuthEvent::SignedIn { .. }));

        let (status, body) = send(&router, Method::GET, "/api/auth/session", None, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], ADMIN_EMAIL);

        let (status, _) = send(&router, Method::POST, "/api/auth/sign-out", None, Some(&token)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(matches!(events.recv().await.unwrap(), AuthEvent::SignedOut { .. }));

        // revoked token no longer opens anything
        let (status, _) = send(&router, Method::GET, "/api/auth/session", None, Some(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&router, Method::GET, "/api/admin/products", None, Some(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let router = build_router(state_for(Surface::Browser).await);
        let (status, body) = send(&router, Method::GET, "/api/auth/session", None, Some("not.a.jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}
