//! Event ingestion
//!
//! POST /api/events
//!
//! The body is validated field by field before anything is persisted, so a
//! rejected request never creates a row.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use leadq_common::db::{self, NewEvent};
use leadq_common::time::parse_utc_timestamp;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{ApiError, ApiResult, FieldError};
use crate::AppState;

/// Acknowledgment for a stored event
#[derive(Debug, Serialize)]
pub struct EventCreated {
    pub status: &'static str,
    pub id: i64,
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EventCreated>)> {
    let Json(body) = payload?;
    let event = validate_event(&body)?;

    let id = db::record_event(&state.db, &event).await?;
    info!(event_id = id, user_id = %event.user_id, action = %event.action, "Recorded event");

    Ok((StatusCode::CREATED, Json(EventCreated { status: "ok", id })))
}

/// Check every field of an event body, reporting all violations at once
pub fn validate_event(body: &Value) -> Result<NewEvent, ApiError> {
    let Some(fields) = body.as_object() else {
        return Err(ApiError::Validation(vec![FieldError::new(
            "body",
            "must be a JSON object",
        )]));
    };

    let mut errors = Vec::new();

    let user_id = required_string(fields, "userId", &mut errors);
    let action = required_string(fields, "action", &mut errors);

    let metadata = match fields.get("metadata") {
        None => Some(Map::new()),
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => {
            errors.push(FieldError::new("metadata", "must be an object"));
            None
        }
    };

    let occurred_at = required_string(fields, "timestamp", &mut errors).and_then(|raw| {
        let parsed = parse_utc_timestamp(&raw);
        if parsed.is_none() {
            errors.push(FieldError::new("timestamp", "must be an ISO-8601 date-time"));
        }
        parsed
    });

    match (user_id, action, metadata, occurred_at) {
        (Some(user_id), Some(action), Some(metadata), Some(occurred_at)) if errors.is_empty() => {
            Ok(NewEvent {
                user_id,
                action,
                metadata,
                occurred_at,
            })
        }
        _ => Err(ApiError::Validation(errors)),
    }
}

fn required_string(
    fields: &Map<String, Value>,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(name) {
        Some(Value::String(s)) => Some(s.clone()),
        None | Some(Value::Null) => {
            errors.push(FieldError::new(name, "field required"));
            None
        }
        Some(_) => {
            errors.push(FieldError::new(name, "must be a string"));
            None
        }
    }
}

/// Build event routes
pub fn event_routes() -> Router<AppState> {
    Router::new().route("/api/events", post(create_event))
}
