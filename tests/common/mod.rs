#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use deals_portal::{
    AppConfig, AppState,
    auth::AuthState,
    models::{
        Boundary, Deal, Lga, OpportunityType, SectorOpportunity, Strategy, StrategyGrade, User,
        UserCredentials,
    },
    repository::{Repository, RepositoryError, RepositoryState},
    session::SessionAuthProvider,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

pub const ANALYST_ID: Uuid = Uuid::from_u128(123);

// --- MOCK REPOSITORY IMPLEMENTATION ---

/// Canned loader results plus failure injection. `failing` names the loader that
/// returns a database timeout; `stalled` names one that never completes.
#[derive(Default, Clone)]
pub struct MockRepo {
    pub lgas: Vec<Lga>,
    pub deals: Vec<Deal>,
    pub opportunity_types: Vec<OpportunityType>,
    pub boundaries: Vec<Boundary>,
    pub strategies: Vec<Strategy>,
    pub strategy_grades: Vec<StrategyGrade>,
    pub sector_opportunities: Vec<SectorOpportunity>,
    pub users: Vec<User>,
    pub credentials: Vec<UserCredentials>,
    pub failing: Option<&'static str>,
    pub stalled: Option<&'static str>,
    pub sector_calls: Arc<AtomicUsize>,
}

impl MockRepo {
    async fn gate(&self, loader: &'static str) -> Result<(), RepositoryError> {
        if self.stalled == Some(loader) {
            std::future::pending::<()>().await;
        }
        if self.failing == Some(loader) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn load_lgas(&self) -> Result<Vec<Lga>, RepositoryError> {
        self.gate("lgas").await?;
        Ok(self.lgas.clone())
    }
    async fn load_deals(&self) -> Result<Vec<Deal>, RepositoryError> {
        self.gate("deals").await?;
        Ok(self.deals.clone())
    }
    async fn load_opportunity_types(&self) -> Result<Vec<OpportunityType>, RepositoryError> {
        self.gate("opportunity_types").await?;
        Ok(self.opportunity_types.clone())
    }
    async fn load_qld_lga_boundaries(&self) -> Result<Vec<Boundary>, RepositoryError> {
        self.gate("boundaries").await?;
        Ok(self.boundaries.clone())
    }
    async fn load_sector_opportunities(&self) -> Result<Vec<SectorOpportunity>, RepositoryError> {
        self.sector_calls.fetch_add(1, Ordering::SeqCst);
        self.gate("sector_opportunities").await?;
        Ok(self.sector_opportunities.clone())
    }
    async fn load_strategies(&self) -> Result<Vec<Strategy>, RepositoryError> {
        self.gate("strategies").await?;
        Ok(self.strategies.clone())
    }
    async fn load_strategy_grades(&self) -> Result<Vec<StrategyGrade>, RepositoryError> {
        self.gate("strategy_grades").await?;
        Ok(self.strategy_grades.clone())
    }
    async fn load_strategy(&self, id: i64) -> Result<Option<Strategy>, RepositoryError> {
        self.gate("strategy").await?;
        Ok(self.strategies.iter().find(|s| s.id == id).cloned())
    }
    async fn load_strategy_grades_for(
        &self,
        strategy_id: i64,
    ) -> Result<Vec<StrategyGrade>, RepositoryError> {
        self.gate("strategy_grades").await?;
        Ok(self
            .strategy_grades
            .iter()
            .filter(|g| g.strategy_id == strategy_id)
            .cloned()
            .collect())
    }
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        self.gate("users").await?;
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
    async fn get_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        self.gate("users").await?;
        Ok(self
            .credentials
            .iter()
            .find(|c| c.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

// --- FIXTURES ---

pub fn brisbane() -> Lga {
    Lga {
        id: 1,
        code: "31000".to_string(),
        name: "Brisbane".to_string(),
        region: Some("South East Queensland".to_string()),
        population: Some(1_264_024),
    }
}

pub fn mining() -> OpportunityType {
    OpportunityType {
        id: "A".to_string(),
        label: "Mining".to_string(),
    }
}

pub fn analyst() -> User {
    User {
        id: ANALYST_ID,
        email: "analyst@example.com".to_string(),
        name: Some("Ana Lyst".to_string()),
        role: "analyst".to_string(),
    }
}

pub fn sample_strategy(id: i64) -> Strategy {
    Strategy {
        id,
        lga_id: 1,
        title: "Brisbane Economic Strategy 2031".to_string(),
        summary: None,
        document_key: Some(format!("strategies/{}.pdf", id)),
        status: "published".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    }
}

pub fn sample_grade(id: i32, strategy_id: i64, category: &str) -> StrategyGrade {
    StrategyGrade {
        id,
        strategy_id,
        category: category.to_string(),
        grade: "B".to_string(),
        score: Some(71.5),
    }
}

pub fn sample_sector(id: i32, sector: &str) -> SectorOpportunity {
    SectorOpportunity {
        id,
        sector: sector.to_string(),
        lga_id: 1,
        opportunity_count: 4,
    }
}

/// The fixed collections used across page tests: one LGA, no deals, one opportunity type.
pub fn seeded_repo() -> MockRepo {
    MockRepo {
        lgas: vec![brisbane()],
        deals: vec![],
        opportunity_types: vec![mining()],
        users: vec![analyst()],
        ..MockRepo::default()
    }
}

// --- STATE ---

pub fn create_test_state(repo: MockRepo) -> AppState {
    let repo = Arc::new(repo) as RepositoryState;
    let config = AppConfig::default();
    let auth = Arc::new(SessionAuthProvider::new(repo.clone(), config.clone())) as AuthState;
    AppState { repo, auth, config }
}
