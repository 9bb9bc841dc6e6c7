//! Persistence sink abstraction.
//!
//! A sink accepts one record shape and returns the id it stored the record
//! under. Sinks are independent: a failure in one never blocks another, and
//! the core never retries.
//!
//! | Trait | Implemented by |
//! |-------|----------------|
//! | [`PersistenceSink<StructuredRecord>`] | structured stores |
//! | [`PersistenceSink<DocumentRecord>`] | document stores |
//! | [`PersistenceSink<ProviderNote>`] | document stores |
//! | [`RecentRecords`] | structured stores |
//! | [`DocumentLookup`] | document stores |

use async_trait::async_trait;

use crate::adapter::{self, DocumentRecord, StructuredRecord};
use crate::error::SinkError;
use crate::models::{Incident, ProviderNote};

#[async_trait]
pub trait PersistenceSink<R: Sync>: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Persist `record`, returning its id.
    async fn save(&self, record: &R) -> Result<String, SinkError>;
}

/// Read access to the most recent structured rows.
#[async_trait]
pub trait RecentRecords: Send + Sync {
    /// Newest first by creation time, at most `limit` rows.
    async fn recent(&self, limit: usize) -> Result<Vec<StructuredRecord>, SinkError>;

    async fn count(&self) -> Result<usize, SinkError>;
}

/// Read access to stored documents and their notes.
#[async_trait]
pub trait DocumentLookup: Send + Sync {
    async fn find(&self, incident_id: &str) -> Result<Option<DocumentRecord>, SinkError>;

    /// Notes for `incident_id`, oldest first.
    async fn notes(&self, incident_id: &str) -> Result<Vec<ProviderNote>, SinkError>;
}

/// Outcome of writing one incident to both sinks.
#[derive(Debug)]
pub struct SaveReport {
    pub incident_id: String,
    pub structured: Result<String, SinkError>,
    pub document: Result<String, SinkError>,
    pub truncated_columns: Vec<&'static str>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.structured.is_ok() && self.document.is_ok()
    }
}

/// Adapt `incident` and hand each projection to its sink.
pub async fn save_incident<S, D>(incident: &Incident, structured: &S, document: &D) -> SaveReport
where
    S: PersistenceSink<StructuredRecord> + ?Sized,
    D: PersistenceSink<DocumentRecord> + ?Sized,
{
    let row = adapter::to_structured(incident);
    if row.truncated {
        tracing::warn!(
            incident = %incident.id,
            columns = ?row.truncated_columns,
            "truncated structured columns"
        );
    }
    let doc = adapter::to_document(incident);

    let structured_result = structured.save(&row.record).await;
    if let Err(e) = &structured_result {
        tracing::warn!(
            sink = structured.name(),
            incident = %incident.id,
            error = %e,
            "save failed"
        );
    }
    let document_result = document.save(&doc.record).await;
    if let Err(e) = &document_result {
        tracing::warn!(sink = document.name(), incident = %incident.id, error = %e, "save failed");
    }

    SaveReport {
        incident_id: incident.id.clone(),
        structured: structured_result,
        document: document_result,
        truncated_columns: row.truncated_columns,
    }
}
