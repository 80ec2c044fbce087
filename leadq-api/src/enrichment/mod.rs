//! Lead enrichment
//!
//! Best-effort augmentation of a lead with a quality tier and a one-sentence
//! summary from an external text-generation service.
//!
//! # Failure isolation
//! `enrich_all` runs one call per lead concurrently and joins them. Each
//! call is bounded by a timeout, and any error or timeout maps to an empty
//! `Enrichment` for that lead only. Nothing here can fail the enclosing
//! request.

pub mod openai;

pub use openai::OpenAiEnricher;

use async_trait::async_trait;
use futures::future::join_all;
use leadq_common::config::EnrichmentConfig;
use leadq_common::db::Lead;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Lead quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    High,
    Medium,
    Low,
}

impl Quality {
    /// Case-insensitive parse of "High" / "Medium" / "Low"
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Quality::High),
            "medium" => Some(Quality::Medium),
            "low" => Some(Quality::Low),
            _ => None,
        }
    }
}

/// Result of enriching one lead; both fields absent means "not enriched"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub quality: Option<Quality>,
    pub summary: Option<String>,
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Source of lead enrichments
#[async_trait]
pub trait Enricher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether calls may reach an external service
    fn is_enabled(&self) -> bool {
        true
    }

    async fn enrich(&self, lead: &Lead) -> Result<Enrichment, EnrichmentError>;
}

/// Enricher used when no credential is configured; never makes a call
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEnricher;

#[async_trait]
impl Enricher for DisabledEnricher {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn enrich(&self, _lead: &Lead) -> Result<Enrichment, EnrichmentError> {
        Ok(Enrichment::default())
    }
}

/// Build the enricher described by `config`
///
/// No credential yields `DisabledEnricher`.
pub fn enricher_from_config(config: &EnrichmentConfig) -> Result<Arc<dyn Enricher>, EnrichmentError> {
    match &config.api_key {
        Some(api_key) => {
            info!(model = %config.model, base_url = %config.base_url, "Lead enrichment enabled");
            Ok(Arc::new(OpenAiEnricher::new(
                api_key.clone(),
                config.model.clone(),
                &config.base_url,
                config.timeout,
            )?))
        }
        None => {
            info!("Lead enrichment disabled (no API key configured)");
            Ok(Arc::new(DisabledEnricher))
        }
    }
}

/// Enrich every lead concurrently, preserving input order
///
/// Failures and timeouts yield `Enrichment::default()` for that lead.
pub async fn enrich_all(
    enricher: &dyn Enricher,
    leads: &[Lead],
    timeout: Duration,
) -> Vec<Enrichment> {
    if !enricher.is_enabled() {
        return vec![Enrichment::default(); leads.len()];
    }

    let calls = leads.iter().map(|lead| async move {
        let outcome = match tokio::time::timeout(timeout, enricher.enrich(lead)).await {
            Ok(result) => result,
            Err(_) => Err(EnrichmentError::Timeout(timeout)),
        };

        match outcome {
            Ok(enrichment) => {
                debug!(enricher = enricher.name(), lead_id = lead.id, "Enrichment successful");
                enrichment
            }
            Err(e) => {
                warn!(
                    enricher = enricher.name(),
                    lead_id = lead.id,
                    error = %e,
                    "Enrichment failed, returning lead without enrichment"
                );
                Enrichment::default()
            }
        }
    });

    join_all(calls).await
}
