use crate::{AppState, auth, handlers, redirects};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that must work before a session exists (landing page, auth bridge) or
/// that never touch data (health, legacy redirects).
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Sign-in landing page, and the target of sign-out.
        .route("/", get(handlers::home_page))
        // GET /health
        // Load balancer check. Returns "ok" without touching the database.
        .route("/health", get(|| async { "ok" }))
        // GET|POST /api/auth/{*rest}
        // Sign-in, callback, sign-out and session checks, forwarded unmodified to the
        // injected auth provider.
        .route("/api/auth/{*rest}", get(auth::auth_get).post(auth::auth_post))
        // GET /strategies/upload
        // Legacy URL. The static segment takes precedence over `{id}` below.
        .route("/strategies/upload", get(redirects::legacy_strategy_upload))
        // GET /strategies/{id}
        // Legacy URL. Any id string is forwarded into the new path.
        .route("/strategies/{id}", get(redirects::legacy_strategy))
}
