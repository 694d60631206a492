use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// The server-rendered pages. Every route here sits behind the `AuthUser` middleware
/// layered on in `create_router`, so handlers never see an anonymous request.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Deals ---
        .route("/deals", get(handlers::deals_page))
        // --- LGAs ---
        .route("/lga/list", get(handlers::lga_list_page))
        .route("/lga/map", get(handlers::lga_map_page))
        // --- Strategies ---
        .route("/lga/strategies", get(handlers::strategies_page))
        // Static segment wins over `{id}`.
        .route("/lga/strategies/upload", get(handlers::strategy_upload_page))
        .route("/lga/strategies/{id}", get(handlers::strategy_detail_page))
        // --- Map ---
        .route("/map", get(handlers::map_page))
        // --- Sectors ---
        // No view of its own; redirects to the list.
        .route("/sectors", get(handlers::sectors_page))
        .route("/sectors/list", get(handlers::sectors_list_page))
}
