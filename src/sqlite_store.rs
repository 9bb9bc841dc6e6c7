//! SQLite-backed persistence sinks.
//!
//! The structured sink writes one row per incident to `incidents`; the
//! document sink keeps the nested document as JSON in `incident_details`
//! and provider notes in `provider_notes`. Each sink owns its own pool and
//! database file.

use anyhow::Context;
use async_trait::async_trait;
use chrono::SecondsFormat;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use incident_sim_core::adapter::{DocumentRecord, StructuredRecord, FIELD_MAP};
use incident_sim_core::error::SinkError;
use incident_sim_core::models::{NoteKind, NoteUrgency, ProviderNote};
use incident_sim_core::sink::{DocumentLookup, PersistenceSink, RecentRecords};

use crate::config::Config;
use crate::db;

/// Columns the structured table manages itself.
const SINK_MANAGED_COLUMNS: &[&str] = &["id"];

fn backend(e: sqlx::Error) -> SinkError {
    SinkError::Unavailable(anyhow::Error::new(e))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

// ============ Structured ============

pub struct SqliteStructuredSink {
    pool: SqlitePool,
}

impl SqliteStructuredSink {
    /// Open the structured store and check its schema against the
    /// adapter's mapping table.
    pub async fn open(config: &Config) -> anyhow::Result<Self> {
        let pool = db::connect_existing(&config.structured_store.path).await?;
        let sink = Self { pool };
        sink.check_schema().await?;
        Ok(sink)
    }

    async fn check_schema(&self) -> anyhow::Result<()> {
        let columns = table_columns(&self.pool, "incidents").await?;
        if columns.is_empty() {
            anyhow::bail!("table 'incidents' does not exist; run `incsim init` first");
        }
        FIELD_MAP
            .validate(&columns, SINK_MANAGED_COLUMNS)
            .context("structured store schema does not match the field mapping")?;
        Ok(())
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Column names of `table`, in declaration order. Empty if it does not exist.
pub async fn table_columns(pool: &SqlitePool, table: &str) -> anyhow::Result<Vec<String>> {
    let rows = sqlx::query(&format!("PRAGMA table_info({})", table))
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(|r| r.get::<String, _>("name")).collect())
}

fn row_to_record(row: &SqliteRow) -> Result<StructuredRecord, sqlx::Error> {
    Ok(StructuredRecord {
        incident_id: row.try_get("incident_id")?,
        caller_first_name: row.try_get("caller_first_name")?,
        caller_last_name: row.try_get("caller_last_name")?,
        caller_age: row.try_get("caller_age")?,
        caller_sex: row.try_get("caller_sex")?,
        caller_phone: row.try_get("caller_phone")?,
        medical_history: row.try_get("medical_history")?,
        age_bucket: row.try_get("age_bucket")?,
        location_address: row.try_get("location_address")?,
        location_area: row.try_get("location_area")?,
        location_zip: row.try_get("location_zip")?,
        location_lat: row.try_get("location_lat")?,
        location_lng: row.try_get("location_lng")?,
        emergency_type: row.try_get("emergency_type")?,
        priority: row.try_get("priority")?,
        priority_factors: row.try_get("priority_factors")?,
        symptoms: row.try_get("symptoms")?,
        blood_pressure: row.try_get("blood_pressure")?,
        heart_rate: row.try_get("heart_rate")?,
        respiratory_rate: row.try_get("respiratory_rate")?,
        temperature: row.try_get("temperature")?,
        oxygen_saturation: row.try_get("oxygen_saturation")?,
        mental_status: row.try_get("mental_status")?,
        pain_level: row.try_get("pain_level")?,
        conscious: row.try_get("conscious")?,
        breathing: row.try_get("breathing")?,
        circulation: row.try_get("circulation")?,
        operator_notes: row.try_get("operator_notes")?,
        call_timestamp: row.try_get("call_timestamp")?,
        created_at: row.try_get("created_at")?,
        status: row.try_get("status")?,
    })
}

#[async_trait]
impl PersistenceSink<StructuredRecord> for SqliteStructuredSink {
    fn name(&self) -> &str {
        "sqlite-structured"
    }

    async fn save(&self, r: &StructuredRecord) -> Result<String, SinkError> {
        let result = sqlx::query(
            r#"
            INSERT INTO incidents (
                incident_id, caller_first_name, caller_last_name, caller_age,
                caller_sex, caller_phone, medical_history, age_bucket,
                location_address, location_area, location_zip, location_lat, location_lng,
                emergency_type, priority, priority_factors, symptoms,
                blood_pressure, heart_rate, respiratory_rate, temperature, oxygen_saturation,
                mental_status, pain_level, conscious, breathing, circulation,
                operator_notes, call_timestamp, created_at, status
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                    ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&r.incident_id)
        .bind(&r.caller_first_name)
        .bind(&r.caller_last_name)
        .bind(r.caller_age)
        .bind(&r.caller_sex)
        .bind(&r.caller_phone)
        .bind(&r.medical_history)
        .bind(&r.age_bucket)
        .bind(&r.location_address)
        .bind(&r.location_area)
        .bind(&r.location_zip)
        .bind(r.location_lat)
        .bind(r.location_lng)
        .bind(&r.emergency_type)
        .bind(r.priority)
        .bind(&r.priority_factors)
        .bind(&r.symptoms)
        .bind(&r.blood_pressure)
        .bind(r.heart_rate)
        .bind(r.respiratory_rate)
        .bind(r.temperature)
        .bind(r.oxygen_saturation)
        .bind(&r.mental_status)
        .bind(r.pain_level)
        .bind(r.conscious)
        .bind(&r.breathing)
        .bind(&r.circulation)
        .bind(&r.operator_notes)
        .bind(&r.call_timestamp)
        .bind(&r.created_at)
        .bind(&r.status)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(r.incident_id.clone()),
            Err(e) if is_unique_violation(&e) => Err(SinkError::Rejected {
                sink: "sqlite-structured".to_string(),
                id: r.incident_id.clone(),
                reason: "incident_id already stored".to_string(),
            }),
            Err(e) => Err(backend(e)),
        }
    }
}

#[async_trait]
impl RecentRecords for SqliteStructuredSink {
    async fn recent(&self, limit: usize) -> Result<Vec<StructuredRecord>, SinkError> {
        let rows = sqlx::query("SELECT * FROM incidents ORDER BY created_at DESC, id DESC LIMIT ?")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        rows.iter()
            .map(|row| row_to_record(row).map_err(backend))
            .collect()
    }

    async fn count(&self) -> Result<usize, SinkError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM incidents")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(n as usize)
    }
}

// ============ Document ============

pub struct SqliteDocumentSink {
    pool: SqlitePool,
}

impl SqliteDocumentSink {
    pub async fn open(config: &Config) -> anyhow::Result<Self> {
        let pool = db::connect_existing(&config.document_store.path).await?;
        let columns = table_columns(&pool, "incident_details").await?;
        if columns.is_empty() {
            anyhow::bail!("table 'incident_details' does not exist; run `incsim init` first");
        }
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl PersistenceSink<DocumentRecord> for SqliteDocumentSink {
    fn name(&self) -> &str {
        "sqlite-document"
    }

    async fn save(&self, doc: &DocumentRecord) -> Result<String, SinkError> {
        let body = serde_json::to_string(doc)?;
        let result = sqlx::query(
            r#"
            INSERT INTO incident_details (incident_id, emergency_type, priority, created_at, body_json)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&doc.incident_id)
        .bind(&doc.emergency_details.kind)
        .bind(doc.emergency_details.priority)
        .bind(&doc.created_at)
        .bind(&body)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(doc.incident_id.clone()),
            Err(e) if is_unique_violation(&e) => Err(SinkError::Rejected {
                sink: "sqlite-document".to_string(),
                id: doc.incident_id.clone(),
                reason: "document already stored".to_string(),
            }),
            Err(e) => Err(backend(e)),
        }
    }
}

#[async_trait]
impl PersistenceSink<ProviderNote> for SqliteDocumentSink {
    fn name(&self) -> &str {
        "sqlite-document"
    }

    async fn save(&self, note: &ProviderNote) -> Result<String, SinkError> {
        let body = serde_json::to_string(note)?;
        let result = sqlx::query(
            r#"
            INSERT INTO provider_notes
                (id, incident_id, crew_id, kind, urgency, requires_followup, recorded_at, body_json)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&note.id)
        .bind(&note.incident_id)
        .bind(&note.crew_id)
        .bind(kind_name(note.kind))
        .bind(urgency_name(note.urgency))
        .bind(note.requires_followup)
        .bind(note.recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .bind(&body)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(note.id.clone()),
            Err(e) if is_unique_violation(&e) => Err(SinkError::Rejected {
                sink: "sqlite-document".to_string(),
                id: note.id.clone(),
                reason: "note already stored".to_string(),
            }),
            Err(e) => Err(backend(e)),
        }
    }
}

fn kind_name(kind: NoteKind) -> &'static str {
    match kind {
        NoteKind::Arrival => "ARRIVAL",
        NoteKind::Assessment => "ASSESSMENT",
        NoteKind::Treatment => "TREATMENT",
        NoteKind::Transport => "TRANSPORT",
        NoteKind::Handoff => "HANDOFF",
        NoteKind::Complication => "COMPLICATION",
    }
}

fn urgency_name(urgency: NoteUrgency) -> &'static str {
    match urgency {
        NoteUrgency::Low => "Low",
        NoteUrgency::Medium => "Medium",
        NoteUrgency::High => "High",
        NoteUrgency::Critical => "Critical",
    }
}

#[async_trait]
impl DocumentLookup for SqliteDocumentSink {
    async fn find(&self, incident_id: &str) -> Result<Option<DocumentRecord>, SinkError> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body_json FROM incident_details WHERE incident_id = ?")
                .bind(incident_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

        match body {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn notes(&self, incident_id: &str) -> Result<Vec<ProviderNote>, SinkError> {
        let bodies: Vec<String> = sqlx::query_scalar(
            "SELECT body_json FROM provider_notes WHERE incident_id = ? ORDER BY recorded_at ASC",
        )
        .bind(incident_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        bodies
            .iter()
            .map(|b| serde_json::from_str(b).map_err(SinkError::from))
            .collect()
    }
}
