//! # Routes
//!
//! Router composition. Route groups are mounted from the surface's
//! [`Capabilities`]; a group the surface lacks simply does not exist and
//! answers 404.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  always     /health, /api/capabilities                            │
//! │  admin      /api/auth/*, /api/admin/*          (browser)          │
//! │  pos        /api/pos/*                         (mobile)           │
//! │  reporting  /api/reports/*                     (both)             │
//! └───────────────────────────────────────────────────────────────────┘
//! ```

use axum::routing::get;
use axum::Router;
use rose_core::surface::Capabilities;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod health;
pub mod pos;
pub mod report;

/// Builds the application router for the configured surface.
pub fn build_router(state: AppState) -> Router {
    let caps = state.capabilities();
    compose(caps).layer(TraceLayer::new_for_http()).with_state(state)
}

fn compose(caps: Capabilities) -> Router<AppState> {
    let mut router = Router::new()
        .route("/health", get(health::health))
        .route("/api/capabilities", get(health::capabilities));

    if caps.admin {
        router = router
            .nest("/api/auth", auth::router())
            .nest("/api/admin", admin::router());
    }
    if caps.point_of_sale {
        router = router.nest("/api/pos", pos::router());
    }
    if caps.reporting {
        router = router.nest("/api/reports", report::router());
    }

    info!(
        admin = caps.admin,
        point_of_sale = caps.point_of_sale,
        reporting = caps.reporting,
        "Route groups mounted"
    );
    router
}

// =============================================================================
// Router Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use rose_core::surface::Surface;
    use rose_db::{hash_password, Database, DbConfig};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::ServerConfig;
    use crate::state::AppState;

    pub const ADMIN_EMAIL: &str = "owner@rose.co";
    pub const ADMIN_PASSWORD: &str = "fresas123";

    pub async fn state_for(surface: Surface) -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut config = ServerConfig::default();
        config.server.surface = surface;
        config.auth.jwt_secret = "router-test-secret".to_string();
        AppState::new(db, config)
    }

    pub async fn with_admin(state: &AppState) {
        let hash = hash_password(ADMIN_PASSWORD).unwrap();
        state.db.admins().create_user(ADMIN_EMAIL, &hash).await.unwrap();
    }

    pub async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Signs the seeded admin in and returns the bearer token.
    pub async fn sign_in(router: &Router) -> String {
        let (status, body) = send(
            router,
            Method::POST,
            "/api/auth/sign-in",
            Some(serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::http::{Method, StatusCode};
    use rose_core::surface::Surface;

    #[tokio::test]
    async fn test_mobile_surface_hides_admin() {
        let router = build_router(state_for(Surface::Mobile).await);

        let (status, _) = send(&router, Method::GET, "/api/admin/products", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&router, Method::GET, "/api/pos/products", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&router, Method::GET, "/api/reports/daily", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_browser_surface_hides_pos() {
        let router = build_router(state_for(Surface::Browser).await);

        let (status, _) = send(&router, Method::GET, "/api/pos/products", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        // mounted, but guarded
        let (status, _) = send(&router, Method::GET, "/api/admin/products", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(&router, Method::GET, "/api/capabilities", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["surface"], "browser");
        assert_eq!(body["capabilities"]["admin"], true);
        assert_eq!(body["capabilities"]["pointOfSale"], false);
    }
}
