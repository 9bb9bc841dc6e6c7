//! Incident retrieval.
//!
//! `incsim get <id>` prints one stored document with its provider notes;
//! `incsim recent` lists the newest structured rows. Both read through the
//! same sink traits the dashboard uses.

use anyhow::{bail, Result};

use incident_sim_core::adapter::DocumentRecord;
use incident_sim_core::sink::{DocumentLookup, RecentRecords};
use incident_sim_core::ProviderNote;

use crate::config::Config;
use crate::sqlite_store::{SqliteDocumentSink, SqliteStructuredSink};

/// Fetch a document and its notes (used by the CLI).
pub async fn get_incident(
    config: &Config,
    id: &str,
) -> Result<(DocumentRecord, Vec<ProviderNote>)> {
    let docs = SqliteDocumentSink::open(config).await?;
    let found = docs.find(id).await?;
    let notes = docs.notes(id).await?;
    docs.close().await;

    match found {
        Some(doc) => Ok((doc, notes)),
        None => bail!("incident not found: {}", id),
    }
}

/// CLI entry point. Prints the document and its notes to stdout.
pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let (doc, notes) = match get_incident(config, id).await {
        Ok(found) => found,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let em = &doc.emergency_details;
    println!("--- Incident ---");
    println!("id:           {}", doc.incident_id);
    println!("type:         {}", em.kind);
    println!("priority:     {}", em.priority);
    if !em.priority_factors.is_empty() {
        println!("factors:      {}", em.priority_factors.join(", "));
    }
    let caller = &doc.caller_info;
    println!("caller:       {} ({}, {})", caller.name, caller.age, caller.sex);
    println!("location:     {}", doc.location.address);
    println!("call time:    {}", doc.call_timestamp);
    println!("status:       {}", doc.status);
    println!();

    println!("--- Document ---");
    println!("{}", serde_json::to_string_pretty(&doc)?);
    println!();

    println!("--- Notes ({}) ---", notes.len());
    for note in &notes {
        let marker = if note.urgency.is_urgent() { "!" } else { " " };
        let followup = if note.requires_followup {
            " follow-up"
        } else {
            ""
        };
        println!(
            "{}[{}] {} ({:?}){}",
            marker,
            note.recorded_at.format("%H:%M"),
            note.kind.label(),
            note.urgency,
            followup
        );
        println!("  by {} ({})", note.created_by, note.crew_id);
        println!("{}", note.content);
        println!();
    }

    Ok(())
}

/// CLI entry point for `incsim recent`.
pub async fn run_recent(config: &Config, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(config.server.recent_limit);
    let rows = SqliteStructuredSink::open(config).await?;
    let recent = rows.recent(limit).await?;
    rows.close().await;

    if recent.is_empty() {
        println!("No incidents stored.");
        return Ok(());
    }

    println!(
        "{:<12} {:>3}  {:<30} {:<20} {}",
        "ID", "P", "TYPE", "AREA", "CALL TIME"
    );
    println!("{}", "-".repeat(90));
    for r in &recent {
        println!(
            "{:<12} {:>3}  {:<30} {:<20} {}",
            r.incident_id, r.priority, r.emergency_type, r.location_area, r.call_timestamp
        );
    }
    Ok(())
}
