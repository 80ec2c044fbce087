//! Lead listing
//!
//! GET /api/leads?industry=&size=&enrich=

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use leadq_common::db::{self, Lead, LeadFilter};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::enrichment::{enrich_all, Enrichment, Quality};
use crate::error::ApiResult;
use crate::AppState;

/// Query parameters for lead listing
#[derive(Debug, Deserialize)]
pub struct LeadQuery {
    pub industry: Option<String>,
    /// Minimum employee count (inclusive)
    pub size: Option<i64>,
    #[serde(default, deserialize_with = "query_flag")]
    pub enrich: bool,
}

/// Boolean query value: true/false, 1/0, yes/no, on/off (any case)
fn query_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(de::Error::custom(format!("invalid boolean '{}'", raw))),
    }
}

/// One lead as returned by the API
///
/// `quality` and `summary` are always present and null unless enriched.
#[derive(Debug, Serialize)]
pub struct LeadResponse {
    #[serde(flatten)]
    pub lead: Lead,
    pub quality: Option<Quality>,
    pub summary: Option<String>,
}

impl LeadResponse {
    fn new(lead: Lead, enrichment: Enrichment) -> Self {
        Self {
            lead,
            quality: enrichment.quality,
            summary: enrichment.summary,
        }
    }
}

/// GET /api/leads
pub async fn list_leads(
    State(state): State<AppState>,
    query: Result<Query<LeadQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<LeadResponse>>> {
    let Query(query) = query?;
    let filter = LeadFilter::new(query.industry, query.size);

    let leads = db::list_leads(&state.db, &filter).await?;
    debug!(count = leads.len(), enrich = query.enrich, ?filter, "Listed leads");

    let enrichments = if query.enrich {
        enrich_all(state.enricher.as_ref(), &leads, state.enrichment_timeout).await
    } else {
        vec![Enrichment::default(); leads.len()]
    };

    let body = leads
        .into_iter()
        .zip(enrichments)
        .map(|(lead, enrichment)| LeadResponse::new(lead, enrichment))
        .collect();

    Ok(Json(body))
}

/// Build lead routes
pub fn lead_routes() -> Router<AppState> {
    Router::new().route("/api/leads", get(list_leads))
}
