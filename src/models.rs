use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Region & Deal Records (Mapped to Database) ---

/// Lga
///
/// A Local Government Area from the `lgas` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Lga {
    pub id: i32,
    // Official ABS LGA code, also the join key for boundary polygons.
    pub code: String,
    pub name: String,
    pub region: Option<String>,
    pub population: Option<i64>,
}

/// Deal
///
/// An economic opportunity tied to one LGA, from the `deals` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Deal {
    pub id: Uuid,
    pub lga_id: i32,
    // FK to opportunity_types.id.
    pub opportunity_type_id: String,
    pub name: String,
    pub description: Option<String>,
    // Pipeline stage, e.g. "lead", "active", "closed".
    pub stage: String,
    pub value_aud: Option<f64>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// OpportunityType
///
/// Categorical tag classifying deals and sectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct OpportunityType {
    pub id: String,
    pub label: String,
}

/// Boundary
///
/// Polygon data for drawing one Queensland LGA on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Boundary {
    pub lga_code: String,
    pub name: String,
    /// GeoJSON geometry, stored as JSONB and passed through untouched.
    #[ts(type = "unknown")]
    #[schema(value_type = Object)]
    pub geometry: serde_json::Value,
}

// --- Strategy Records ---

/// Strategy
///
/// A planning document associated with an LGA, from the `strategies` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Strategy {
    pub id: i64,
    pub lga_id: i32,
    pub title: String,
    pub summary: Option<String>,
    // Storage key of the uploaded source document, if one was attached.
    pub document_key: Option<String>,
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// StrategyGrade
///
/// One graded category of a strategy assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StrategyGrade {
    pub id: i32,
    pub strategy_id: i64,
    pub category: String,
    pub grade: String,
    pub score: Option<f64>,
}

/// SectorOpportunity
///
/// Links an industry sector to a region's opportunity count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SectorOpportunity {
    pub id: i32,
    pub sector: String,
    pub lga_id: i32,
    pub opportunity_count: i64,
}

/// PageData
///
/// The bundle returned by `Repository::load_page_data`. `sector_opportunities` is empty
/// for views that do not display sectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PageData {
    pub lgas: Vec<Lga>,
    pub deals: Vec<Deal>,
    pub opportunity_types: Vec<OpportunityType>,
    pub sector_opportunities: Vec<SectorOpportunity>,
}

// --- Identity ---

/// User
///
/// A signed-in user's public identity from the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    // RBAC field: 'analyst' or 'admin'.
    pub role: String,
}

/// UserCredentials
///
/// Internal row used only by the credentials sign-in flow. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}
