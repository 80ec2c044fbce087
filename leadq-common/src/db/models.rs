//! Database models
//!
//! Struct field names are independent of storage column names; the
//! row-mapping functions in `leads` and `events` hold the mapping.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prospective customer, created only by the seed import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub industry: String,
    /// Employee count
    pub size: i64,
    /// Origin channel
    pub source: String,
    pub created_at: NaiveDateTime,
}

/// Stored user-interaction telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub user_id: String,
    pub action: String,
    /// Opaque to the service: stored and returned, never interpreted
    pub metadata: Map<String, Value>,
    pub occurred_at: DateTime<Utc>,
}

/// Event awaiting insertion (id not yet assigned)
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub user_id: String,
    pub action: String,
    pub metadata: Map<String, Value>,
    pub occurred_at: DateTime<Utc>,
}
