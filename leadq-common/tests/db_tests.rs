//! Database integration tests
//!
//! Covers schema creation, the one-time seed import, lead filtering and
//! event persistence against a real SQLite file in a temporary directory.

use chrono::{TimeZone, Utc};
use leadq_common::db::{
    count_events, count_leads, get_event, init_database, list_leads, record_event,
    seed_leads_from_csv, LeadFilter, NewEvent, SeedOutcome, SkipReason,
};
use leadq_common::Error;
use serde_json::json;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;

const SEED_CSV: &str = "\
id,name,company,industry,size,source,created_at
1,Ann Lee,Acme,Tech,50,Web,2024-01-01T00:00:00Z
2,Bob Ray,Globex,Finance,200,Referral,2024-01-02T08:30:00Z
3,Cy Dunn,Initech,Tech,5,Event,2024-01-03T17:45:00Z
4,Di Moss,Umbrella,tech,500,Web,2024-01-04T10:00:00Z
";

struct TestDb {
    _dir: TempDir,
    pool: SqlitePool,
    seed_path: PathBuf,
}

async fn setup(seed: Option<&str>) -> TestDb {
    let dir = TempDir::new().unwrap();
    let seed_path = dir.path().join("leads.csv");
    if let Some(content) = seed {
        std::fs::write(&seed_path, content).unwrap();
    }
    let pool = init_database(&dir.path().join("app.db")).await.unwrap();
    TestDb { _dir: dir, pool, seed_path }
}

async fn seeded() -> TestDb {
    let db = setup(Some(SEED_CSV)).await;
    let outcome = seed_leads_from_csv(&db.pool, &db.seed_path).await.unwrap();
    assert_eq!(outcome, SeedOutcome::Imported { rows: 4 });
    db
}

fn ids(leads: &[leadq_common::db::Lead]) -> Vec<i64> {
    leads.iter().map(|l| l.id).collect()
}

// =============================================================================
// Schema
// =============================================================================

#[tokio::test]
async fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("app.db");

    let first = init_database(&path).await.unwrap();
    assert!(path.exists());
    drop(first);

    let second = init_database(&path).await.unwrap();
    assert_eq!(count_leads(&second).await.unwrap(), 0);
    assert_eq!(count_events(&second).await.unwrap(), 0);
}

// =============================================================================
// Seed import
// =============================================================================

#[tokio::test]
async fn test_seed_preserves_ids_and_fields() {
    let db = seeded().await;

    let leads = list_leads(&db.pool, &LeadFilter::default()).await.unwrap();
    assert_eq!(ids(&leads), vec![1, 2, 3, 4]);

    let acme = &leads[0];
    assert_eq!(acme.name, "Ann Lee");
    assert_eq!(acme.company, "Acme");
    assert_eq!(acme.industry, "Tech");
    assert_eq!(acme.size, 50);
    assert_eq!(acme.source, "Web");
    assert_eq!(acme.created_at.to_string(), "2024-01-01 00:00:00");
}

#[tokio::test]
async fn test_seed_twice_does_not_duplicate() {
    let db = seeded().await;

    let second = seed_leads_from_csv(&db.pool, &db.seed_path).await.unwrap();
    assert_eq!(second, SeedOutcome::Skipped(SkipReason::TableNotEmpty));
    assert_eq!(count_leads(&db.pool).await.unwrap(), 4);
}

#[tokio::test]
async fn test_seed_missing_file_is_skipped() {
    let db = setup(None).await;

    let outcome = seed_leads_from_csv(&db.pool, &db.seed_path).await.unwrap();
    assert_eq!(outcome, SeedOutcome::Skipped(SkipReason::FileMissing));
    assert_eq!(count_leads(&db.pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_seed_reruns_after_table_emptied() {
    let db = seeded().await;

    sqlx::query("DELETE FROM leads").execute(&db.pool).await.unwrap();
    let outcome = seed_leads_from_csv(&db.pool, &db.seed_path).await.unwrap();

    assert_eq!(outcome, SeedOutcome::Imported { rows: 4 });
}

#[tokio::test]
async fn test_malformed_seed_aborts_whole_import() {
    let content = "\
id,name,company,industry,size,source,created_at
1,Ann Lee,Acme,Tech,50,Web,2024-01-01T00:00:00Z
x,Bob Ray,Globex,Finance,200,Referral,2024-01-02T08:30:00Z
";
    let db = setup(Some(content)).await;

    let err = seed_leads_from_csv(&db.pool, &db.seed_path).await.unwrap_err();
    assert!(matches!(err, Error::Seed { line: 3, .. }), "got {:?}", err);
    assert_eq!(count_leads(&db.pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_seed_id_rolls_back() {
    let content = "\
id,name,company,industry,size,source,created_at
1,Ann Lee,Acme,Tech,50,Web,2024-01-01T00:00:00Z
1,Bob Ray,Globex,Finance,200,Referral,2024-01-02T08:30:00Z
";
    let db = setup(Some(content)).await;

    let err = seed_leads_from_csv(&db.pool, &db.seed_path).await.unwrap_err();
    assert!(matches!(err, Error::Seed { line: 3, .. }), "got {:?}", err);
    assert_eq!(count_leads(&db.pool).await.unwrap(), 0);
}

// =============================================================================
// Lead filtering
// =============================================================================

#[tokio::test]
async fn test_industry_filter_is_exact_and_case_sensitive() {
    let db = seeded().await;

    let filter = LeadFilter::new(Some("Tech".to_string()), None);
    let leads = list_leads(&db.pool, &filter).await.unwrap();

    assert_eq!(ids(&leads), vec![1, 3]);
    assert!(leads.iter().all(|l| l.industry == "Tech"));
}

#[tokio::test]
async fn test_min_size_filter_is_inclusive() {
    let db = seeded().await;

    let filter = LeadFilter::new(None, Some(50));
    let leads = list_leads(&db.pool, &filter).await.unwrap();

    assert_eq!(ids(&leads), vec![1, 2, 4]);
}

#[tokio::test]
async fn test_filters_combine_as_intersection() {
    let db = seeded().await;

    let filter = LeadFilter::new(Some("Tech".to_string()), Some(10));
    let leads = list_leads(&db.pool, &filter).await.unwrap();
    assert_eq!(ids(&leads), vec![1]);

    let none = LeadFilter::new(Some("Finance".to_string()), Some(1000));
    assert!(list_leads(&db.pool, &none).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_industry_returns_empty() {
    let db = seeded().await;

    let filter = LeadFilter::new(Some("Agriculture".to_string()), None);
    assert!(list_leads(&db.pool, &filter).await.unwrap().is_empty());
}

// =============================================================================
// Events
// =============================================================================

#[tokio::test]
async fn test_record_event_round_trips_metadata() {
    let db = setup(None).await;
    let metadata = json!({
        "page": "leads",
        "count": 3,
        "ratio": 0.25,
        "dark": true,
        "missing": null,
        "nested": {"tags": ["a", "b"], "depth": {"level": 2}}
    });
    let occurred_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let id = record_event(
        &db.pool,
        &NewEvent {
            user_id: "u1".to_string(),
            action: "filter_change".to_string(),
            metadata: metadata.as_object().unwrap().clone(),
            occurred_at,
        },
    )
    .await
    .unwrap();

    assert_eq!(count_events(&db.pool).await.unwrap(), 1);
    let stored = get_event(&db.pool, id).await.unwrap().expect("event stored");
    assert_eq!(stored.id, id);
    assert_eq!(stored.user_id, "u1");
    assert_eq!(stored.action, "filter_change");
    assert_eq!(serde_json::Value::Object(stored.metadata), metadata);
    assert_eq!(stored.occurred_at, occurred_at);
}

#[tokio::test]
async fn test_record_event_keeps_number_precision() {
    let db = setup(None).await;
    let metadata: serde_json::Value = serde_json::from_str(
        r#"{"big": 123456789012345678901234567890, "tiny": 2.2250738585072011e-308, "exact": 9007199254740993}"#,
    )
    .unwrap();

    let id = record_event(
        &db.pool,
        &NewEvent {
            user_id: "u1".to_string(),
            action: "export".to_string(),
            metadata: metadata.as_object().unwrap().clone(),
            occurred_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        },
    )
    .await
    .unwrap();

    let stored = get_event(&db.pool, id).await.unwrap().expect("event stored");
    assert_eq!(stored.metadata["big"].to_string(), "123456789012345678901234567890");
    assert_eq!(stored.metadata["tiny"].to_string(), "2.2250738585072011e-308");
    assert_eq!(stored.metadata["exact"].to_string(), "9007199254740993");
    assert_eq!(serde_json::Value::Object(stored.metadata), metadata);
}

#[tokio::test]
async fn test_record_event_assigns_increasing_ids() {
    let db = setup(None).await;
    let event = NewEvent {
        user_id: "u1".to_string(),
        action: "click".to_string(),
        metadata: Default::default(),
        occurred_at: Utc::now(),
    };

    let first = record_event(&db.pool, &event).await.unwrap();
    let second = record_event(&db.pool, &event).await.unwrap();

    assert!(second > first);
    assert_eq!(count_events(&db.pool).await.unwrap(), 2);
}

#[tokio::test]
async fn test_get_missing_event_is_none() {
    let db = setup(None).await;
    assert!(get_event(&db.pool, 42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_closed_pool_surfaces_database_error() {
    let db = setup(None).await;
    db.pool.close().await;

    let err = list_leads(&db.pool, &LeadFilter::default()).await.unwrap_err();
    assert!(err.is_storage(), "got {:?}", err);
}
