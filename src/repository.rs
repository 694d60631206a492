use crate::models::{
    Boundary, Deal, Lga, OpportunityType, PageData, SectorOpportunity, Strategy, StrategyGrade,
    User, UserCredentials,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// RepositoryError
///
/// Every loader failure surfaces as one of these. Callers never receive a partial
/// or defaulted result in its place.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unknown page view: {0}")]
    UnknownView(String),
}

/// Views understood by `load_page_data`, and whether each one shows sector opportunities.
const PAGE_VIEWS: &[(&str, bool)] = &[
    ("lga-list", true),
    ("sectors-list", true),
    ("lga-map", false),
    ("deals", false),
    ("map", false),
];

/// Repository Trait
///
/// The data loaders consumed by the page layer. Each method is an independent,
/// potentially failing read; the page handlers decide which ones to run together.
///
/// **Send + Sync + async_trait** keep the trait object (`Arc<dyn Repository>`)
/// shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Region Data ---
    async fn load_lgas(&self) -> Result<Vec<Lga>, RepositoryError>;
    async fn load_deals(&self) -> Result<Vec<Deal>, RepositoryError>;
    async fn load_opportunity_types(&self) -> Result<Vec<OpportunityType>, RepositoryError>;
    // Polygons for every Queensland LGA.
    async fn load_qld_lga_boundaries(&self) -> Result<Vec<Boundary>, RepositoryError>;
    async fn load_sector_opportunities(&self) -> Result<Vec<SectorOpportunity>, RepositoryError>;

    // --- Strategies ---
    async fn load_strategies(&self) -> Result<Vec<Strategy>, RepositoryError>;
    async fn load_strategy_grades(&self) -> Result<Vec<StrategyGrade>, RepositoryError>;
    async fn load_strategy(&self, id: i64) -> Result<Option<Strategy>, RepositoryError>;
    async fn load_strategy_grades_for(
        &self,
        strategy_id: i64,
    ) -> Result<Vec<StrategyGrade>, RepositoryError>;

    // --- Identity ---
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn get_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, RepositoryError>;

    /// load_page_data
    ///
    /// Loads the shared bundle for a named view: LGAs, deals and opportunity types,
    /// plus sector opportunities when the view displays them. The loads run
    /// concurrently and the first failure aborts the rest.
    async fn load_page_data(&self, view: &str) -> Result<PageData, RepositoryError> {
        let with_sectors = PAGE_VIEWS
            .iter()
            .find(|(name, _)| *name == view)
            .map(|(_, with_sectors)| *with_sectors)
            .ok_or_else(|| RepositoryError::UnknownView(view.to_string()))?;

        let sectors = async {
            if with_sectors {
                self.load_sector_opportunities().await
            } else {
                Ok(Vec::new())
            }
        };

        let (lgas, deals, opportunity_types, sector_opportunities) = tokio::try_join!(
            self.load_lgas(),
            self.load_deals(),
            self.load_opportunity_types(),
            sectors,
        )?;

        Ok(PageData {
            lgas,
            deals,
            opportunity_types,
            sector_opportunities,
        })
    }
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_all<T>(
        &self,
        label: &'static str,
        sql: &'static str,
    ) -> Result<Vec<T>, RepositoryError>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        sqlx::query_as::<_, T>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("{} error: {:?}", label, e);
                RepositoryError::from(e)
            })
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn load_lgas(&self) -> Result<Vec<Lga>, RepositoryError> {
        self.fetch_all(
            "load_lgas",
            "SELECT id, code, name, region, population FROM lgas ORDER BY name",
        )
        .await
    }

    async fn load_deals(&self) -> Result<Vec<Deal>, RepositoryError> {
        self.fetch_all(
            "load_deals",
            r#"SELECT id, lga_id, opportunity_type_id, name, description, stage, value_aud, created_at
               FROM deals
               ORDER BY created_at DESC"#,
        )
        .await
    }

    async fn load_opportunity_types(&self) -> Result<Vec<OpportunityType>, RepositoryError> {
        self.fetch_all(
            "load_opportunity_types",
            "SELECT id, label FROM opportunity_types ORDER BY label",
        )
        .await
    }

    async fn load_qld_lga_boundaries(&self) -> Result<Vec<Boundary>, RepositoryError> {
        self.fetch_all(
            "load_qld_lga_boundaries",
            "SELECT lga_code, name, geometry FROM qld_lga_boundaries ORDER BY lga_code",
        )
        .await
    }

    async fn load_sector_opportunities(&self) -> Result<Vec<SectorOpportunity>, RepositoryError> {
        self.fetch_all(
            "load_sector_opportunities",
            r#"SELECT id, sector, lga_id, opportunity_count
               FROM sector_opportunities
               ORDER BY sector, lga_id"#,
        )
        .await
    }

    async fn load_strategies(&self) -> Result<Vec<Strategy>, RepositoryError> {
        self.fetch_all(
            "load_strategies",
            r#"SELECT id, lga_id, title, summary, document_key, status, created_at
               FROM strategies
               ORDER BY created_at DESC"#,
        )
        .await
    }

    async fn load_strategy_grades(&self) -> Result<Vec<StrategyGrade>, RepositoryError> {
        self.fetch_all(
            "load_strategy_grades",
            r#"SELECT id, strategy_id, category, grade, score
               FROM strategy_grades
               ORDER BY strategy_id, category"#,
        )
        .await
    }

    async fn load_strategy(&self, id: i64) -> Result<Option<Strategy>, RepositoryError> {
        sqlx::query_as::<_, Strategy>(
            r#"SELECT id, lga_id, title, summary, document_key, status, created_at
               FROM strategies
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("load_strategy error: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn load_strategy_grades_for(
        &self,
        strategy_id: i64,
    ) -> Result<Vec<StrategyGrade>, RepositoryError> {
        sqlx::query_as::<_, StrategyGrade>(
            r#"SELECT id, strategy_id, category, grade, score
               FROM strategy_grades
               WHERE strategy_id = $1
               ORDER BY category"#,
        )
        .bind(strategy_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("load_strategy_grades_for error: {:?}", e);
            RepositoryError::from(e)
        })
    }

    /// get_user
    ///
    /// Used by the `AuthUser` extractor on every authenticated request, so a user deleted
    /// after sign-in loses access immediately.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, User>("SELECT id, email, name, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("get_user error: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn get_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, password_hash FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("get_credentials error: {:?}", e);
            RepositoryError::from(e)
        })
    }
}
