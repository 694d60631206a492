use crate::{
    AppState,
    error::PageError,
    session::CREDENTIALS_CALLBACK,
    views::{
        DealsSearch, FullMap, LgaList, LgaMap, Page, SectorList, SignIn, StrategiesIndex,
        StrategyDetail, StrategyUpload,
    },
};
use axum::{
    extract::{Path, State},
    response::Redirect,
};

/// home_page
///
/// [Public Route] Landing page with the sign-in form. Sign-out redirects here.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Sign-in page", content_type = "text/html"))
)]
pub async fn home_page() -> Page<SignIn> {
    Page(SignIn {
        sign_in_url: CREDENTIALS_CALLBACK,
    })
}

// --- Page Handlers ---
//
// Every data page follows the same shape: start all of its loaders together, wait for
// all of them, and hand the results to one component untouched. `try_join!` returns
// on the first failure and drops the sibling loads still in flight.

/// deals_page
///
/// [Authenticated Route] Deals search view.
#[utoipa::path(
    get,
    path = "/deals",
    responses(
        (status = 200, description = "Deals search view", content_type = "text/html"),
        (status = 500, description = "A data loader failed")
    )
)]
pub async fn deals_page(State(state): State<AppState>) -> Result<Page<DealsSearch>, PageError> {
    let (lgas, deals, opportunity_types) = tokio::try_join!(
        state.repo.load_lgas(),
        state.repo.load_deals(),
        state.repo.load_opportunity_types(),
    )?;

    Ok(Page(DealsSearch {
        lgas,
        deals,
        opportunity_types,
    }))
}

/// lga_list_page
///
/// [Authenticated Route] LGA list with sector opportunity counts. Uses the bundled
/// `load_page_data` loader rather than individual calls.
#[utoipa::path(
    get,
    path = "/lga/list",
    responses(
        (status = 200, description = "LGA list", content_type = "text/html"),
        (status = 500, description = "A data loader failed")
    )
)]
pub async fn lga_list_page(State(state): State<AppState>) -> Result<Page<LgaList>, PageError> {
    let data = state.repo.load_page_data("lga-list").await?;

    Ok(Page(LgaList {
        lgas: data.lgas,
        deals: data.deals,
        opportunity_types: data.opportunity_types,
        sector_opportunities: data.sector_opportunities,
    }))
}

/// lga_map_page
///
/// [Authenticated Route] Map of LGAs with their deals.
#[utoipa::path(
    get,
    path = "/lga/map",
    responses(
        (status = 200, description = "LGA map view", content_type = "text/html"),
        (status = 500, description = "A data loader failed")
    )
)]
pub async fn lga_map_page(State(state): State<AppState>) -> Result<Page<LgaMap>, PageError> {
    let (lgas, deals, opportunity_types) = tokio::try_join!(
        state.repo.load_lgas(),
        state.repo.load_deals(),
        state.repo.load_opportunity_types(),
    )?;

    Ok(Page(LgaMap {
        lgas,
        deals,
        opportunity_types,
    }))
}

/// strategies_page
///
/// [Authenticated Route] Strategies index with grades and sector opportunities.
#[utoipa::path(
    get,
    path = "/lga/strategies",
    responses(
        (status = 200, description = "Strategies index", content_type = "text/html"),
        (status = 500, description = "A data loader failed")
    )
)]
pub async fn strategies_page(
    State(state): State<AppState>,
) -> Result<Page<StrategiesIndex>, PageError> {
    let (strategies, strategy_grades, sector_opportunities) = tokio::try_join!(
        state.repo.load_strategies(),
        state.repo.load_strategy_grades(),
        state.repo.load_sector_opportunities(),
    )?;

    Ok(Page(StrategiesIndex {
        strategies,
        strategy_grades,
        sector_opportunities,
    }))
}

/// strategy_upload_page
///
/// [Authenticated Route] Upload form. No data loading.
#[utoipa::path(
    get,
    path = "/lga/strategies/upload",
    responses((status = 200, description = "Strategy upload form", content_type = "text/html"))
)]
pub async fn strategy_upload_page() -> Page<StrategyUpload> {
    Page(StrategyUpload {})
}

/// strategy_detail_page
///
/// [Authenticated Route] One strategy and its grades. Target of the legacy
/// `/strategies/{id}` redirect.
#[utoipa::path(
    get,
    path = "/lga/strategies/{id}",
    params(("id" = i64, Path, description = "Strategy ID")),
    responses(
        (status = 200, description = "Strategy detail", content_type = "text/html"),
        (status = 404, description = "No such strategy, or a non-numeric id"),
        (status = 500, description = "A data loader failed")
    )
)]
pub async fn strategy_detail_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Page<StrategyDetail>, PageError> {
    // Legacy redirects forward any id; a non-numeric one names no strategy.
    let id: i64 = id.parse().map_err(|_| PageError::NotFound)?;

    let (strategy, grades) = tokio::try_join!(
        state.repo.load_strategy(id),
        state.repo.load_strategy_grades_for(id),
    )?;

    let strategy = strategy.ok_or(PageError::NotFound)?;
    Ok(Page(StrategyDetail { strategy, grades }))
}

/// map_page
///
/// [Authenticated Route] Full map including QLD LGA boundary polygons.
#[utoipa::path(
    get,
    path = "/map",
    responses(
        (status = 200, description = "Full map", content_type = "text/html"),
        (status = 500, description = "A data loader failed")
    )
)]
pub async fn map_page(State(state): State<AppState>) -> Result<Page<FullMap>, PageError> {
    let (lgas, deals, opportunity_types, boundaries) = tokio::try_join!(
        state.repo.load_lgas(),
        state.repo.load_deals(),
        state.repo.load_opportunity_types(),
        state.repo.load_qld_lga_boundaries(),
    )?;

    Ok(Page(FullMap {
        lgas,
        deals,
        opportunity_types,
        boundaries,
    }))
}

/// sectors_page
///
/// [Authenticated Route] Has no view of its own; defaults to the list sub-view.
#[utoipa::path(
    get,
    path = "/sectors",
    responses((status = 307, description = "Redirect to /sectors/list"))
)]
pub async fn sectors_page() -> Redirect {
    Redirect::temporary("/sectors/list")
}

/// sectors_list_page
///
/// [Authenticated Route] Sector opportunities across LGAs.
#[utoipa::path(
    get,
    path = "/sectors/list",
    responses(
        (status = 200, description = "Sector list", content_type = "text/html"),
        (status = 500, description = "A data loader failed")
    )
)]
pub async fn sectors_list_page(
    State(state): State<AppState>,
) -> Result<Page<SectorList>, PageError> {
    let data = state.repo.load_page_data("sectors-list").await?;

    Ok(Page(SectorList {
        lgas: data.lgas,
        deals: data.deals,
        opportunity_types: data.opportunity_types,
        sector_opportunities: data.sector_opportunities,
    }))
}
