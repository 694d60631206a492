use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod redirects;
pub mod repository;
pub mod session;
pub mod views;

// Routing segregation (Public, Authenticated).
pub mod routes;
use auth::AuthUser;
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use auth::{AuthProvider, AuthState};
pub use config::AppConfig;
pub use repository::{PostgresRepository, Repository, RepositoryState};
pub use session::SessionAuthProvider;

/// ApiDoc
///
/// OpenAPI document for the route surface, served at `/api-docs/openapi.json`.
/// Pages are documented as `text/html`; the record schemas describe the props the
/// client components receive.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home_page, handlers::deals_page, handlers::lga_list_page,
        handlers::lga_map_page, handlers::strategies_page, handlers::strategy_upload_page,
        handlers::strategy_detail_page, handlers::map_page, handlers::sectors_page,
        handlers::sectors_list_page, redirects::legacy_strategy,
        redirects::legacy_strategy_upload
    ),
    components(
        schemas(
            models::Lga, models::Deal, models::OpportunityType, models::Boundary,
            models::Strategy, models::StrategyGrade, models::SectorOpportunity,
            models::PageData, models::User,
        )
    ),
    tags(
        (name = "deals-portal", description = "Regional deals and strategies portal")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container of services and configuration, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Data loaders.
    pub repo: RepositoryState,
    /// Injected authentication provider behind `/api/auth/*`.
    pub auth: AuthState,
    /// Configuration: loaded once, immutable.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(app_state: &AppState) -> AuthState {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the page routes. Extracting `AuthUser` rejects the
/// request with 401 before the handler runs if no valid session is present.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, applies scoped and global middleware and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 1. Static Assets: the client bundle the page shells load.
    let assets = ServeDir::new(&state.config.assets_dir);

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: the generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/assets", assets)
        // Public Routes: landing page, health, auth bridge, legacy redirects.
        .merge(public::public_routes())
        // Page Routes: every one requires a session. `route_layer` only runs the check
        // for requests that matched one of these routes, so unknown paths still 404.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (outermost first)
    base_router.layer(
        ServiceBuilder::new()
            // 3a. Request ID Generation: a fresh UUID per incoming request.
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            // 3b. Request Tracing: one span per request, tagged with that ID.
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            // 3c. Request ID Propagation: echo x-request-id back to the client.
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Opens the per-request span, tagged with the generated `x-request-id` so every log
/// line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
