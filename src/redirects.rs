use axum::{http::Uri, response::Redirect};

// Strategies moved under /lga. These routes keep old bookmarks working.

/// Target for a legacy strategy URL. The id is forwarded verbatim, unvalidated.
pub fn legacy_strategy_target(id: &str) -> String {
    format!("/lga/strategies/{}", id)
}

/// legacy_strategy
///
/// [Public Route] `/strategies/{id}` to `/lga/strategies/{id}`.
#[utoipa::path(
    get,
    path = "/strategies/{id}",
    params(("id" = String, Path, description = "Strategy ID, forwarded as-is")),
    responses((status = 307, description = "Redirect to /lga/strategies/{id}"))
)]
pub async fn legacy_strategy(uri: Uri) -> Redirect {
    // Raw segment from the request line, so percent-encoding survives the round trip.
    let id = uri.path().rsplit('/').next().unwrap_or_default();
    Redirect::temporary(&legacy_strategy_target(id))
}

/// legacy_strategy_upload
///
/// [Public Route] `/strategies/upload` to `/lga/strategies/upload`.
#[utoipa::path(
    get,
    path = "/strategies/upload",
    responses((status = 307, description = "Redirect to /lga/strategies/upload"))
)]
pub async fn legacy_strategy_upload() -> Redirect {
    Redirect::temporary("/lga/strategies/upload")
}
