//! One-time CSV seed import for the leads table
//!
//! The import runs only while the leads table is empty and the seed file
//! exists. All rows are inserted in one transaction: a malformed row aborts
//! the whole import and nothing is committed.

use crate::db::leads::{has_leads, insert_lead};
use crate::db::models::Lead;
use crate::time::parse_naive_timestamp;
use crate::{Error, Result};
use serde::{de, Deserialize, Deserializer};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "company",
    "industry",
    "size",
    "source",
    "created_at",
];

/// Result of a seed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Imported { rows: u64 },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Leads already present; the gate is "table currently empty"
    TableNotEmpty,
    FileMissing,
}

#[derive(Debug, Deserialize)]
struct SeedRow {
    #[serde(deserialize_with = "padded_int")]
    id: i64,
    name: String,
    company: String,
    industry: String,
    #[serde(deserialize_with = "padded_int")]
    size: i64,
    source: String,
    created_at: String,
}

/// Integer cell that may carry surrounding spaces
fn padded_int<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.trim()
        .parse()
        .map_err(|_| de::Error::custom(format!("invalid integer '{}'", raw)))
}

/// Import leads from `path` if the leads table is empty
pub async fn seed_leads_from_csv(pool: &SqlitePool, path: &Path) -> Result<SeedOutcome> {
    if has_leads(pool).await? {
        debug!("Leads table not empty, skipping seed import");
        return Ok(SeedOutcome::Skipped(SkipReason::TableNotEmpty));
    }
    if !path.exists() {
        info!("Seed file not found, skipping import: {}", path.display());
        return Ok(SeedOutcome::Skipped(SkipReason::FileMissing));
    }

    let content = tokio::fs::read(path).await?;
    let leads = parse_seed_csv(&content)?;

    let mut tx = pool.begin().await?;
    for (line, lead) in &leads {
        insert_lead(&mut *tx, lead).await.map_err(|e| Error::Seed {
            line: *line,
            message: format!("cannot insert lead {}: {}", lead.id, e),
        })?;
    }
    tx.commit().await?;

    let rows = leads.len() as u64;
    info!("Seeded {} leads from {}", rows, path.display());
    Ok(SeedOutcome::Imported { rows })
}

/// Parse every row of the seed file, paired with its line number
///
/// Only header names are trimmed; text cells are stored exactly as written.
fn parse_seed_csv(content: &[u8]) -> Result<Vec<(u64, Lead)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(content);

    let headers = reader
        .headers()
        .map_err(|e| Error::Seed { line: 1, message: e.to_string() })?
        .clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(Error::Seed {
            line: 1,
            message: format!("missing required column '{}'", missing),
        });
    }

    let mut leads = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::Seed {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: SeedRow = record
            .deserialize(Some(&headers))
            .map_err(|e| Error::Seed { line, message: e.to_string() })?;

        let created_at = parse_naive_timestamp(&row.created_at).ok_or_else(|| Error::Seed {
            line,
            message: format!("invalid created_at '{}'", row.created_at),
        })?;

        leads.push((
            line,
            Lead {
                id: row.id,
                name: row.name,
                company: row.company,
                industry: row.industry,
                size: row.size,
                source: row.source,
                created_at,
            },
        ));
    }

    Ok(leads)
}
