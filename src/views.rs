use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use crate::models::{
    Boundary, Deal, Lga, OpportunityType, SectorOpportunity, Strategy, StrategyGrade,
};

/// Component
///
/// A presentational component rendered on the client. The server's only job is to
/// hand it its props: the struct itself is the props object, serialized as JSON.
pub trait Component: Serialize {
    /// Name the client bundle uses to pick the component to mount.
    const NAME: &'static str;
    /// Document `<title>`.
    const TITLE: &'static str;
}

/// Page
///
/// Response wrapper produced by every page handler. Keeping the component unrendered
/// until `into_response` lets tests inspect exactly what a handler composed.
#[derive(Debug)]
pub struct Page<C>(pub C);

impl<C: Component> IntoResponse for Page<C> {
    fn into_response(self) -> Response {
        match render_document(&self.0) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!(component = C::NAME, "failed to serialize props: {}", e);
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, Html(error_document(status))).into_response()
            }
        }
    }
}

/// render_document
///
/// Builds the HTML shell: a mount point tagged with the component name, the props
/// embedded as inert JSON, and the client bundle.
pub fn render_document<C: Component>(component: &C) -> Result<String, serde_json::Error> {
    let props = escape_json_for_script(&serde_json::to_string(component)?);
    Ok(format!(
        concat!(
            "<!DOCTYPE html>",
            "<html lang=\"en\">",
            "<head>",
            "<meta charset=\"utf-8\">",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
            "<title>{title}</title>",
            "<link rel=\"stylesheet\" href=\"/assets/app.css\">",
            "</head>",
            "<body>",
            "<div id=\"root\" data-component=\"{name}\"></div>",
            "<script id=\"__PAGE_PROPS__\" type=\"application/json\">{props}</script>",
            "<script type=\"module\" src=\"/assets/app.js\"></script>",
            "</body>",
            "</html>"
        ),
        title = C::TITLE,
        name = C::NAME,
        props = props,
    ))
}

/// Minimal document for the error boundary. Carries no detail about the failure.
pub fn error_document(status: StatusCode) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{reason}</title></head>\
         <body><h1>{code} {reason}</h1></body></html>",
        code = status.as_u16(),
    )
}

// Props land inside <script>; a literal "</script>" in any string must not end it.
fn escape_json_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(ch),
        }
    }
    out
}

// --- Components ---

/// Deals search view (`/deals`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealsSearch {
    pub lgas: Vec<Lga>,
    pub deals: Vec<Deal>,
    pub opportunity_types: Vec<OpportunityType>,
}

impl Component for DealsSearch {
    const NAME: &'static str = "DealsSearch";
    const TITLE: &'static str = "Deals";
}

/// LGA list (`/lga/list`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LgaList {
    pub lgas: Vec<Lga>,
    pub deals: Vec<Deal>,
    pub opportunity_types: Vec<OpportunityType>,
    pub sector_opportunities: Vec<SectorOpportunity>,
}

impl Component for LgaList {
    const NAME: &'static str = "LgaList";
    const TITLE: &'static str = "Local Government Areas";
}

/// LGA map view (`/lga/map`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LgaMap {
    pub lgas: Vec<Lga>,
    pub deals: Vec<Deal>,
    pub opportunity_types: Vec<OpportunityType>,
}

impl Component for LgaMap {
    const NAME: &'static str = "LgaMap";
    const TITLE: &'static str = "LGA Map";
}

/// Strategies index (`/lga/strategies`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategiesIndex {
    pub strategies: Vec<Strategy>,
    pub strategy_grades: Vec<StrategyGrade>,
    pub sector_opportunities: Vec<SectorOpportunity>,
}

impl Component for StrategiesIndex {
    const NAME: &'static str = "StrategiesIndex";
    const TITLE: &'static str = "Strategies";
}

/// Strategy upload form (`/lga/strategies/upload`). Takes no props.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyUpload {}

impl Component for StrategyUpload {
    const NAME: &'static str = "StrategyUpload";
    const TITLE: &'static str = "Upload Strategy";
}

/// Single strategy with its grades (`/lga/strategies/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDetail {
    pub strategy: Strategy,
    pub grades: Vec<StrategyGrade>,
}

impl Component for StrategyDetail {
    const NAME: &'static str = "StrategyDetail";
    const TITLE: &'static str = "Strategy";
}

/// Full map with boundary polygons (`/map`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullMap {
    pub lgas: Vec<Lga>,
    pub deals: Vec<Deal>,
    pub opportunity_types: Vec<OpportunityType>,
    pub boundaries: Vec<Boundary>,
}

impl Component for FullMap {
    const NAME: &'static str = "FullMap";
    const TITLE: &'static str = "Map";
}

/// Sector list (`/sectors/list`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorList {
    pub lgas: Vec<Lga>,
    pub deals: Vec<Deal>,
    pub opportunity_types: Vec<OpportunityType>,
    pub sector_opportunities: Vec<SectorOpportunity>,
}

impl Component for SectorList {
    const NAME: &'static str = "SectorList";
    const TITLE: &'static str = "Sectors";
}

/// Public landing page (`/`): the sign-in form. Also where sign-out lands.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignIn {
    /// Endpoint the form posts credentials to.
    pub sign_in_url: &'static str,
}

impl Component for SignIn {
    const NAME: &'static str = "SignIn";
    const TITLE: &'static str = "Sign in";
}
