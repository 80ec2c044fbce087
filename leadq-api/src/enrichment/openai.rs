//! Chat-completions enrichment client
//!
//! Sends company, industry and size to an OpenAI-compatible
//! `/chat/completions` endpoint with temperature 0 and a JSON-object
//! response format, then reads `quality` and `summary` out of the reply.

use super::{Enricher, Enrichment, EnrichmentError, Quality};
use async_trait::async_trait;
use leadq_common::db::Lead;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a B2B sales analyst. Answer only with a JSON object \
containing exactly the keys \"quality\" and \"summary\".";

/// Longest error body kept in `EnrichmentError::Status`
const MAX_ERROR_BODY: usize = 200;

pub struct OpenAiEnricher {
    http_client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

impl OpenAiEnricher {
    /// Create a client for `base_url` (e.g. `https://api.openai.com/v1`)
    pub fn new(
        api_key: String,
        model: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, EnrichmentError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            model,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    fn request_body(&self, lead: &Lead) -> Value {
        json!({
            "model": self.model,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(lead) },
            ],
        })
    }
}

#[async_trait]
impl Enricher for OpenAiEnricher {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn enrich(&self, lead: &Lead) -> Result<Enrichment, EnrichmentError> {
        debug!(lead_id = lead.id, endpoint = %self.endpoint, "Requesting enrichment");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(lead))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Parse(format!("invalid completion body: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EnrichmentError::Parse("completion has no message content".to_string()))?;

        parse_enrichment(&content)
    }
}

/// Deterministic prompt for one lead
pub fn build_prompt(lead: &Lead) -> String {
    format!(
        "Assess the sales lead quality of the company \"{}\" in the {} industry with {} employees. \
Respond with JSON: {{\"quality\": \"High\" | \"Medium\" | \"Low\", \"summary\": \"<one sentence>\"}}.",
        lead.company, lead.industry, lead.size
    )
}

/// Read `quality` and `summary` from the model's JSON object reply
///
/// Missing or unrecognized values are left absent; a reply that is not a
/// JSON object is an error.
pub fn parse_enrichment(content: &str) -> Result<Enrichment, EnrichmentError> {
    let value: Value = serde_json::from_str(content.trim())
        .map_err(|e| EnrichmentError::Parse(format!("reply is not JSON: {}", e)))?;

    let Value::Object(fields) = value else {
        return Err(EnrichmentError::Parse("reply is not a JSON object".to_string()));
    };

    let quality = fields
        .get("quality")
        .and_then(Value::as_str)
        .and_then(Quality::parse);
    let summary = fields
        .get("summary")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(Enrichment { quality, summary })
}
