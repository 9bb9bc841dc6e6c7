use anyhow::{Context, Result};

use crate::config::Config;
use crate::db;

/// Create both stores' tables. Safe to run repeatedly.
pub async fn run_migrations(config: &Config) -> Result<()> {
    migrate_structured(config)
        .await
        .context("structured store migration failed")?;
    migrate_documents(config)
        .await
        .context("document store migration failed")?;
    Ok(())
}

async fn migrate_structured(config: &Config) -> Result<()> {
    let pool = db::connect(&config.structured_store.path).await?;

    // Column widths mirror the adapter's mapping table. SQLite does not
    // enforce VARCHAR lengths; the adapter truncates before insert.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS incidents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            incident_id VARCHAR(12) NOT NULL UNIQUE,
            caller_first_name VARCHAR(50) NOT NULL,
            caller_last_name VARCHAR(50) NOT NULL,
            caller_age INTEGER NOT NULL,
            caller_sex VARCHAR(10) NOT NULL,
            caller_phone VARCHAR(15) NOT NULL DEFAULT '',
            medical_history VARCHAR(100) NOT NULL DEFAULT 'None',
            age_bucket VARCHAR(10) NOT NULL,
            location_address VARCHAR(200) NOT NULL,
            location_area VARCHAR(50) NOT NULL,
            location_zip VARCHAR(10) NOT NULL,
            location_lat REAL NOT NULL,
            location_lng REAL NOT NULL,
            emergency_type VARCHAR(100) NOT NULL,
            priority INTEGER NOT NULL CHECK (priority BETWEEN 1 AND 5),
            priority_factors VARCHAR(50) NOT NULL DEFAULT '',
            symptoms VARCHAR(255) NOT NULL,
            blood_pressure VARCHAR(7) NOT NULL,
            heart_rate INTEGER NOT NULL,
            respiratory_rate INTEGER NOT NULL,
            temperature REAL NOT NULL,
            oxygen_saturation INTEGER NOT NULL,
            mental_status VARCHAR(50) NOT NULL,
            pain_level INTEGER NOT NULL,
            conscious INTEGER NOT NULL,
            breathing VARCHAR(20) NOT NULL,
            circulation VARCHAR(20) NOT NULL,
            operator_notes VARCHAR(500) NOT NULL,
            call_timestamp TEXT NOT NULL,
            created_at TEXT NOT NULL,
            status VARCHAR(50) NOT NULL DEFAULT 'dispatched'
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_incidents_created_at ON incidents(created_at DESC)")
        .execute(&pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_incidents_priority ON incidents(priority)")
        .execute(&pool)
        .await?;

    pool.close().await;
    Ok(())
}

async fn migrate_documents(config: &Config) -> Result<()> {
    let pool = db::connect(&config.document_store.path).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS incident_details (
            incident_id TEXT PRIMARY KEY,
            emergency_type TEXT NOT NULL,
            priority INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            body_json TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS provider_notes (
            id TEXT PRIMARY KEY,
            incident_id TEXT NOT NULL,
            crew_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            urgency TEXT NOT NULL,
            requires_followup INTEGER NOT NULL,
            recorded_at TEXT NOT NULL,
            body_json TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_provider_notes_incident ON provider_notes(incident_id, recorded_at)",
    )
    .execute(&pool)
    .await?;

    pool.close().await;
    Ok(())
}
