//! Event persistence
//!
//! Metadata is stored as serialized JSON text in the `metadata` column.

use crate::db::models::{Event, NewEvent};
use crate::{Error, Result};
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Insert one event, returning its generated id
pub async fn record_event(pool: &SqlitePool, event: &NewEvent) -> Result<i64> {
    let metadata = serde_json::to_string(&event.metadata)?;

    let result = sqlx::query(
        r#"
        INSERT INTO events (user_id, action, metadata, occurred_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&event.user_id)
    .bind(&event.action)
    .bind(metadata)
    .bind(event.occurred_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Load a single event by id
pub async fn get_event(pool: &SqlitePool, id: i64) -> Result<Option<Event>> {
    let row = sqlx::query(
        "SELECT id, user_id, action, metadata, occurred_at FROM events WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(event_from_row).transpose()
}

/// Total number of stored events
pub async fn count_events(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn event_from_row(row: &SqliteRow) -> Result<Event> {
    let raw: String = row.try_get("metadata")?;
    let metadata: Map<String, Value> = match serde_json::from_str::<Value>(&raw)? {
        Value::Object(map) => map,
        other => {
            return Err(Error::InvalidInput(format!(
                "Stored event metadata is not an object: {}",
                other
            )))
        }
    };

    Ok(Event {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        action: row.try_get("action")?,
        metadata,
        occurred_at: row.try_get("occurred_at")?,
    })
}
