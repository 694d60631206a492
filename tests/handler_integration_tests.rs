mod common;

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use common::*;
use deals_portal::{
    error::PageError,
    handlers,
    models::Boundary,
    repository::RepositoryError,
    views::{Page, StrategyUpload},
};
use std::{sync::atomic::Ordering, time::Duration};
use tokio::test;

// --- PASS-THROUGH ---

#[test]
async fn test_deals_page_passes_loader_results_through() {
    let state = create_test_state(seeded_repo());

    let Page(view) = handlers::deals_page(State(state)).await.unwrap();

    assert_eq!(view.lgas, vec![brisbane()]);
    assert!(view.deals.is_empty());
    assert_eq!(view.opportunity_types, vec![mining()]);
}

#[test]
async fn test_lga_map_page_passes_loader_results_through() {
    let state = create_test_state(seeded_repo());

    let Page(view) = handlers::lga_map_page(State(state)).await.unwrap();

    assert_eq!(view.lgas, vec![brisbane()]);
    assert_eq!(view.opportunity_types, vec![mining()]);
}

#[test]
async fn test_lga_list_page_includes_sector_opportunities() {
    let repo = MockRepo {
        sector_opportunities: vec![sample_sector(1, "Agriculture"), sample_sector(2, "Tourism")],
        ..seeded_repo()
    };
    let state = create_test_state(repo);

    let Page(view) = handlers::lga_list_page(State(state)).await.unwrap();

    assert_eq!(view.lgas, vec![brisbane()]);
    // Order is preserved exactly as loaded.
    let sectors: Vec<_> = view.sector_opportunities.iter().map(|s| s.sector.as_str()).collect();
    assert_eq!(sectors, vec!["Agriculture", "Tourism"]);
}

#[test]
async fn test_map_page_includes_boundaries() {
    let boundary = Boundary {
        lga_code: "31000".to_string(),
        name: "Brisbane".to_string(),
        geometry: serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[153.0, -27.4], [153.1, -27.4], [153.1, -27.5], [153.0, -27.4]]]
        }),
    };
    let repo = MockRepo {
        boundaries: vec![boundary.clone()],
        ..seeded_repo()
    };
    let state = create_test_state(repo);

    let Page(view) = handlers::map_page(State(state)).await.unwrap();

    assert_eq!(view.boundaries, vec![boundary]);
    assert_eq!(view.lgas, vec![brisbane()]);
}

#[test]
async fn test_strategies_page_passes_all_three_collections() {
    let repo = MockRepo {
        strategies: vec![sample_strategy(42)],
        strategy_grades: vec![sample_grade(1, 42, "Governance")],
        sector_opportunities: vec![sample_sector(1, "Energy")],
        ..seeded_repo()
    };
    let state = create_test_state(repo);

    let Page(view) = handlers::strategies_page(State(state)).await.unwrap();

    assert_eq!(view.strategies, vec![sample_strategy(42)]);
    assert_eq!(view.strategy_grades, vec![sample_grade(1, 42, "Governance")]);
    assert_eq!(view.sector_opportunities, vec![sample_sector(1, "Energy")]);
}

#[test]
async fn test_strategy_upload_page_loads_nothing() {
    // Takes no state at all.
    let Page(view) = handlers::strategy_upload_page().await;
    assert_eq!(view, StrategyUpload {});
}

#[test]
async fn test_strategy_detail_page_filters_grades_by_strategy() {
    let repo = MockRepo {
        strategies: vec![sample_strategy(42), sample_strategy(7)],
        strategy_grades: vec![
            sample_grade(1, 42, "Governance"),
            sample_grade(2, 7, "Workforce"),
        ],
        ..seeded_repo()
    };
    let state = create_test_state(repo);

    let Page(view) = handlers::strategy_detail_page(State(state), Path("42".to_string()))
        .await
        .unwrap();

    assert_eq!(view.strategy.id, 42);
    assert_eq!(view.grades, vec![sample_grade(1, 42, "Governance")]);
}

#[test]
async fn test_strategy_detail_page_not_found() {
    let state = create_test_state(seeded_repo());

    let result = handlers::strategy_detail_page(State(state), Path("999".to_string())).await;

    let err = result.unwrap_err();
    assert!(matches!(err, PageError::NotFound));
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[test]
async fn test_strategy_detail_page_non_numeric_id_is_not_found() {
    let state = create_test_state(MockRepo {
        strategies: vec![sample_strategy(42)],
        ..seeded_repo()
    });

    let response = handlers::strategy_detail_page(State(state), Path("abc".to_string()))
        .await
        .into_response();

    // Same generic HTML page as any other missing strategy.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("404 Not Found"));
    assert!(!body.contains("abc"));
}

#[test]
async fn test_home_page_points_at_credentials_sign_in() {
    let Page(view) = handlers::home_page().await;
    assert_eq!(view.sign_in_url, "/api/auth/callback/credentials");
}

// --- FAILURE PROPAGATION ---

#[test]
async fn test_deals_page_fails_when_one_loader_fails() {
    let state = create_test_state(MockRepo {
        failing: Some("deals"),
        ..seeded_repo()
    });

    let result = handlers::deals_page(State(state)).await;

    // No empty-deals substitution: the whole render fails.
    assert!(matches!(
        result,
        Err(PageError::Loader(RepositoryError::Database(_)))
    ));
}

#[test]
async fn test_failed_render_becomes_generic_500_page() {
    let state = create_test_state(MockRepo {
        failing: Some("boundaries"),
        ..seeded_repo()
    });

    let response = handlers::map_page(State(state)).await.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("500 Internal Server Error"));
    // Loader detail stays in the logs.
    assert!(!body.contains("pool timed out"));
}

#[test]
async fn test_first_failure_cancels_stalled_siblings() {
    // `lgas` never completes. If the composer waited for every sibling to settle,
    // this would hang until the timeout.
    let state = create_test_state(MockRepo {
        stalled: Some("lgas"),
        failing: Some("opportunity_types"),
        ..seeded_repo()
    });

    let result = tokio::time::timeout(Duration::from_secs(2), handlers::lga_map_page(State(state)))
        .await
        .expect("composer should return on the first failure");

    assert!(matches!(result, Err(PageError::Loader(_))));
}

#[test]
async fn test_lga_list_fails_when_sector_loader_fails() {
    let state = create_test_state(MockRepo {
        failing: Some("sector_opportunities"),
        ..seeded_repo()
    });

    let result = handlers::lga_list_page(State(state)).await;

    assert!(result.is_err());
}

#[test]
async fn test_strategies_page_fails_when_grades_fail() {
    let state = create_test_state(MockRepo {
        strategies: vec![sample_strategy(42)],
        failing: Some("strategy_grades"),
        ..seeded_repo()
    });

    let result = handlers::strategies_page(State(state)).await;

    assert!(matches!(
        result,
        Err(PageError::Loader(RepositoryError::Database(_)))
    ));
}

#[test]
async fn test_sectors_list_fails_when_lgas_fail() {
    let state = create_test_state(MockRepo {
        sector_opportunities: vec![sample_sector(1, "Energy")],
        failing: Some("lgas"),
        ..seeded_repo()
    });

    let result = handlers::sectors_list_page(State(state)).await;

    assert!(matches!(result, Err(PageError::Loader(_))));
}

// --- PAGE DATA BUNDLE ---

#[test]
async fn test_page_data_skips_sectors_for_map_views() {
    let repo = MockRepo {
        sector_opportunities: vec![sample_sector(1, "Energy")],
        ..seeded_repo()
    };
    let calls = repo.sector_calls.clone();
    let state = create_test_state(repo);

    let data = state.repo.load_page_data("lga-map").await.unwrap();

    assert!(data.sector_opportunities.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let data = state.repo.load_page_data("sectors-list").await.unwrap();
    assert_eq!(data.sector_opportunities.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
async fn test_page_data_rejects_unknown_view() {
    let state = create_test_state(seeded_repo());

    let result = state.repo.load_page_data("nonexistent").await;

    assert!(matches!(result, Err(RepositoryError::UnknownView(view)) if view == "nonexistent"));
}

// --- SECTORS ---

#[test]
async fn test_sectors_page_redirects_to_list() {
    let response = handlers::sectors_page().await.into_response();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/sectors/list");
}

#[test]
async fn test_sectors_list_page_uses_page_data() {
    let repo = MockRepo {
        sector_opportunities: vec![sample_sector(3, "Defence")],
        ..seeded_repo()
    };
    let state = create_test_state(repo);

    let Page(view) = handlers::sectors_list_page(State(state)).await.unwrap();

    assert_eq!(view.sector_opportunities, vec![sample_sector(3, "Defence")]);
    assert_eq!(view.opportunity_types, vec![mining()]);
}
