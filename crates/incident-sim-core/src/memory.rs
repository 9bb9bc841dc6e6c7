//! In-memory sink for tests and dry runs.
//!
//! Holds both projections and provider notes behind `std::sync::RwLock`.
//! A record whose id is already stored is rejected, like a primary key.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::adapter::{DocumentRecord, StructuredRecord};
use crate::error::SinkError;
use crate::models::ProviderNote;
use crate::sink::{DocumentLookup, PersistenceSink, RecentRecords};

pub struct InMemorySink {
    name: String,
    rows: RwLock<Vec<StructuredRecord>>,
    documents: RwLock<HashMap<String, DocumentRecord>>,
    notes: RwLock<Vec<ProviderNote>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: RwLock::new(Vec::new()),
            documents: RwLock::new(HashMap::new()),
            notes: RwLock::new(Vec::new()),
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, SinkError> {
    lock.read()
        .map_err(|_| SinkError::Unavailable(anyhow::anyhow!("in-memory sink lock poisoned")))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, SinkError> {
    lock.write()
        .map_err(|_| SinkError::Unavailable(anyhow::anyhow!("in-memory sink lock poisoned")))
}

impl InMemorySink {
    fn duplicate(&self, id: &str) -> SinkError {
        SinkError::Rejected {
            sink: self.name.clone(),
            id: id.to_string(),
            reason: "duplicate id".to_string(),
        }
    }
}

#[async_trait]
impl PersistenceSink<StructuredRecord> for InMemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn save(&self, record: &StructuredRecord) -> Result<String, SinkError> {
        let mut rows = write(&self.rows)?;
        if rows.iter().any(|r| r.incident_id == record.incident_id) {
            return Err(self.duplicate(&record.incident_id));
        }
        rows.push(record.clone());
        Ok(record.incident_id.clone())
    }
}

#[async_trait]
impl PersistenceSink<DocumentRecord> for InMemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn save(&self, record: &DocumentRecord) -> Result<String, SinkError> {
        let mut docs = write(&self.documents)?;
        if docs.contains_key(&record.incident_id) {
            return Err(self.duplicate(&record.incident_id));
        }
        docs.insert(record.incident_id.clone(), record.clone());
        Ok(record.incident_id.clone())
    }
}

#[async_trait]
impl PersistenceSink<ProviderNote> for InMemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn save(&self, note: &ProviderNote) -> Result<String, SinkError> {
        let mut notes = write(&self.notes)?;
        if notes.iter().any(|n| n.id == note.id) {
            return Err(self.duplicate(&note.id));
        }
        notes.push(note.clone());
        Ok(note.id.clone())
    }
}

#[async_trait]
impl RecentRecords for InMemorySink {
    async fn recent(&self, limit: usize) -> Result<Vec<StructuredRecord>, SinkError> {
        let rows = read(&self.rows)?;
        let mut out: Vec<StructuredRecord> = rows.iter().rev().cloned().collect();
        // RFC 3339 UTC strings sort chronologically.
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out.truncate(limit);
        Ok(out)
    }

    async fn count(&self) -> Result<usize, SinkError> {
        Ok(read(&self.rows)?.len())
    }
}

#[async_trait]
impl DocumentLookup for InMemorySink {
    async fn find(&self, incident_id: &str) -> Result<Option<DocumentRecord>, SinkError> {
        Ok(read(&self.documents)?.get(incident_id).cloned())
    }

    async fn notes(&self, incident_id: &str) -> Result<Vec<ProviderNote>, SinkError> {
        let mut out: Vec<ProviderNote> = read(&self.notes)?
            .iter()
            .filter(|n| n.incident_id == incident_id)
            .cloned()
            .collect();
        out.sort_by_key(|n| n.recorded_at);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchFactory;
    use crate::context::GenerationContext;
    use crate::notes::ProviderNoteFactory;
    use crate::sink::save_incident;

    #[tokio::test]
    async fn test_save_incident_writes_both_projections() {
        let mut ctx = GenerationContext::seeded(31);
        let (incidents, _) = BatchFactory::new().generate_batch(&mut ctx, 5);
        let sink = InMemorySink::new();

        for inc in &incidents {
            let report = save_incident(inc, &sink, &sink).await;
            assert!(report.is_complete());
            assert_eq!(report.structured.as_deref().ok(), Some(inc.id.as_str()));
        }

        assert_eq!(sink.count().await.unwrap(), 5);
        assert_eq!(sink.document_count(), 5);
        let doc = sink.find(&incidents[2].id).await.unwrap().unwrap();
        assert_eq!(doc.incident_id, incidents[2].id);
        assert!(sink.find("INC00000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_is_rejected_per_sink() {
        let mut ctx = GenerationContext::seeded(32);
        let (incidents, _) = BatchFactory::new().generate_batch(&mut ctx, 1);
        let structured = InMemorySink::named("rows");
        let documents = InMemorySink::named("docs");

        assert!(save_incident(&incidents[0], &structured, &documents)
            .await
            .is_complete());
        let again = save_incident(&incidents[0], &structured, &documents).await;
        assert!(!again.is_complete());
        match again.structured {
            Err(SinkError::Rejected { sink, .. }) => assert_eq!(sink, "rows"),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(again.document.is_err());
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let mut ctx = GenerationContext::seeded(33);
        let (incidents, _) = BatchFactory::new().generate_batch(&mut ctx, 4);
        let sink = InMemorySink::new();
        for inc in &incidents {
            save_incident(inc, &sink, &sink).await;
        }
        let recent = sink.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].created_at >= recent[1].created_at);
    }

    #[tokio::test]
    async fn test_notes_are_returned_in_time_order() {
        let mut ctx = GenerationContext::seeded(34);
        let (incidents, _) = BatchFactory::new().generate_batch(&mut ctx, 1);
        let sink = InMemorySink::new();
        let timeline = ProviderNoteFactory::new().timeline(&mut ctx, &incidents[0], 4);
        for note in timeline.iter().rev() {
            PersistenceSink::<ProviderNote>::save(&sink, note).await.unwrap();
        }
        let stored = sink.notes(&incidents[0].id).await.unwrap();
        assert_eq!(stored, timeline);
    }
}
