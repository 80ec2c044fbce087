//! Lead queries

use crate::db::models::Lead;
use crate::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};

const LEAD_COLUMNS: &str = "id, name, company, industry, size, source, created_at";

/// Optional, conjunctive lead filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    /// Exact, case-sensitive industry match
    pub industry: Option<String>,
    /// Inclusive lower bound on employee count
    pub min_size: Option<i64>,
}

impl LeadFilter {
    pub fn new(industry: Option<String>, min_size: Option<i64>) -> Self {
        Self {
            industry: industry.filter(|i| !i.is_empty()),
            min_size,
        }
    }
}

/// List leads matching `filter`, ordered by id
pub async fn list_leads(pool: &SqlitePool, filter: &LeadFilter) -> Result<Vec<Lead>> {
    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM leads", LEAD_COLUMNS));

    let mut separator = " WHERE ";
    if let Some(industry) = &filter.industry {
        query.push(separator).push("industry = ").push_bind(industry.clone());
        separator = " AND ";
    }
    if let Some(min_size) = filter.min_size {
        query.push(separator).push("size >= ").push_bind(min_size);
    }
    query.push(" ORDER BY id");

    let rows = query.build().fetch_all(pool).await?;
    let leads = rows
        .iter()
        .map(lead_from_row)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(leads)
}

/// Total number of stored leads
pub async fn count_leads(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Whether the leads table holds at least one row
pub(crate) async fn has_leads(pool: &SqlitePool) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM leads)")
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub(crate) async fn insert_lead(
    conn: &mut SqliteConnection,
    lead: &Lead,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO leads (id, name, company, industry, size, source, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(lead.id)
    .bind(&lead.name)
    .bind(&lead.company)
    .bind(&lead.industry)
    .bind(lead.size)
    .bind(&lead.source)
    .bind(lead.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

fn lead_from_row(row: &SqliteRow) -> std::result::Result<Lead, sqlx::Error> {
    Ok(Lead {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        company: row.try_get("company")?,
        industry: row.try_get("industry")?,
        size: row.try_get("size")?,
        source: row.try_get("source")?,
        created_at: row.try_get("created_at")?,
    })
}
