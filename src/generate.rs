//! Generation pipeline orchestration.
//!
//! Coordinates one run: context → batch factory → adapter → both sinks,
//! plus optional provider-note timelines. Sink failures are counted and
//! logged per incident; they never abort the run.

use anyhow::Result;

use incident_sim_core::batch::BatchFactory;
use incident_sim_core::context::{offset_from_hours, GenerationContext};
use incident_sim_core::factory::IncidentRequest;
use incident_sim_core::notes::ProviderNoteFactory;
use incident_sim_core::sink::{save_incident, PersistenceSink};
use incident_sim_core::ProviderNote;

use crate::config::Config;
use crate::sqlite_store::{SqliteDocumentSink, SqliteStructuredSink};
use crate::stats::print_batch_stats;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Falls back to `generation.default_count`.
    pub count: Option<usize>,
    /// Overrides `generation.seed`.
    pub seed: Option<u64>,
    pub emergency_type: Option<String>,
    /// Overrides `generation.notes_per_incident`.
    pub notes: Option<usize>,
    pub dry_run: bool,
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub generated: usize,
    pub skipped: usize,
    pub structured_saved: usize,
    pub documents_saved: usize,
    pub notes_saved: usize,
    pub truncated: usize,
    pub failures: usize,
}

/// Build the generation context from config plus CLI overrides.
pub fn build_context(config: &Config, seed: Option<u64>) -> GenerationContext {
    let ctx = match seed.or(config.generation.seed) {
        Some(s) => GenerationContext::seeded(s),
        None => GenerationContext::from_entropy(),
    };
    ctx.with_utc_offset(offset_from_hours(config.generation.utc_offset_hours))
        .with_call_window_secs(config.generation.call_window_secs)
}

pub async fn run_generate(config: &Config, opts: &GenerateOptions) -> Result<RunSummary> {
    let count = opts.count.unwrap_or(config.generation.default_count);
    let notes_per_incident = opts.notes.unwrap_or(config.generation.notes_per_incident);
    let mut ctx = build_context(config, opts.seed);

    let template = IncidentRequest {
        emergency_type: opts.emergency_type.clone(),
        ..IncidentRequest::default()
    };

    let outcome = BatchFactory::new().generate_batch_with(&mut ctx, count, &template);
    let mut summary = RunSummary {
        generated: outcome.incidents.len(),
        skipped: outcome.skipped,
        ..RunSummary::default()
    };

    if opts.dry_run {
        println!("generate (dry-run)");
        for inc in &outcome.incidents {
            println!(
                "  {}  P{}  {:<30} {}",
                inc.id,
                inc.emergency.priority,
                inc.emergency.kind.label(),
                inc.location.area
            );
        }
        print_summary(&summary, true);
        print_batch_stats(&outcome.stats);
        return Ok(summary);
    }

    let structured = SqliteStructuredSink::open(config).await?;
    let documents = SqliteDocumentSink::open(config).await?;
    let note_factory = ProviderNoteFactory::new();

    for inc in &outcome.incidents {
        let report = save_incident(inc, &structured, &documents).await;
        if !report.truncated_columns.is_empty() {
            summary.truncated += 1;
        }
        match report.structured {
            Ok(_) => summary.structured_saved += 1,
            Err(_) => summary.failures += 1,
        }
        match report.document {
            Ok(_) => summary.documents_saved += 1,
            Err(_) => summary.failures += 1,
        }

        if notes_per_incident > 0 {
            for note in note_factory.timeline(&mut ctx, inc, notes_per_incident) {
                match PersistenceSink::<ProviderNote>::save(&documents, &note).await {
                    Ok(_) => summary.notes_saved += 1,
                    Err(e) => {
                        tracing::warn!(
                            incident = %inc.id,
                            note = %note.id,
                            error = %e,
                            "note save failed"
                        );
                        summary.failures += 1;
                    }
                }
            }
        }
    }

    structured.close().await;
    documents.close().await;

    tracing::info!(
        generated = summary.generated,
        failures = summary.failures,
        "generation run finished"
    );

    print_summary(&summary, false);
    print_batch_stats(&outcome.stats);
    Ok(summary)
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    if !dry_run {
        println!("generate");
    }
    println!("  generated: {}", summary.generated);
    if summary.skipped > 0 {
        println!("  skipped: {}", summary.skipped);
    }
    if !dry_run {
        println!("  structured saved: {}", summary.structured_saved);
        println!("  documents saved: {}", summary.documents_saved);
        if summary.notes_saved > 0 {
            println!("  notes saved: {}", summary.notes_saved);
        }
        if summary.truncated > 0 {
            println!("  truncated rows: {}", summary.truncated);
        }
        if summary.failures > 0 {
            println!("  failures: {}", summary.failures);
        }
    }
    println!("ok");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::migrate;
    use incident_sim_core::sink::RecentRecords;
    use incident_sim_core::Clock;

    fn config_in(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::minimal();
        config.structured_store = StoreConfig {
            path: dir.path().join("incidents.sqlite"),
        };
        config.document_store = StoreConfig {
            path: dir.path().join("details.sqlite"),
        };
        config
    }

    #[test]
    fn test_cli_seed_overrides_config_seed() {
        let mut config = Config::minimal();
        config.generation.seed = Some(1);
        let at = chrono::DateTime::parse_from_rfc3339("2024-03-01T15:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let stats = |seed| {
            let mut ctx = build_context(&config, seed).with_clock(Clock::Fixed(at));
            BatchFactory::new().generate_batch(&mut ctx, 25).1
        };
        assert_eq!(stats(Some(9)), stats(Some(9)));
        assert_eq!(stats(None), stats(Some(1)));
    }

    #[tokio::test]
    async fn test_run_writes_both_stores_and_notes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        migrate::run_migrations(&config).await.unwrap();

        let opts = GenerateOptions {
            count: Some(6),
            seed: Some(7),
            notes: Some(3),
            ..GenerateOptions::default()
        };
        let summary = run_generate(&config, &opts).await.unwrap();
        assert_eq!(summary.generated, 6);
        assert_eq!(summary.structured_saved, 6);
        assert_eq!(summary.documents_saved, 6);
        assert_eq!(summary.notes_saved, 18);
        assert_eq!(summary.failures, 0);

        let rows = SqliteStructuredSink::open(&config).await.unwrap();
        assert_eq!(rows.count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_unknown_type_skips_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        migrate::run_migrations(&config).await.unwrap();

        let opts = GenerateOptions {
            count: Some(3),
            seed: Some(1),
            emergency_type: Some("Alien Abduction".to_string()),
            ..GenerateOptions::default()
        };
        let summary = run_generate(&config, &opts).await.unwrap();
        assert_eq!(summary.generated, 0);
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.structured_saved, 0);
    }
}
