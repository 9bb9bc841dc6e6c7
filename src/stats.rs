//! Store statistics.
//!
//! `incsim stats` summarises what both stores hold: row, document and note
//! counts, file sizes, and per-type and per-priority breakdowns of the
//! structured rows. The same table layout prints after each generate run.

use anyhow::{bail, Result};
use sqlx::{Row, SqlitePool};

use incident_sim_core::batch::Stats;
use incident_sim_core::category::EmergencyType;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::table_columns;

async fn require_tables(pool: &SqlitePool, tables: &[&str]) -> Result<()> {
    for table in tables {
        if table_columns(pool, table).await?.is_empty() {
            bail!("table '{}' does not exist; run `incsim init` first", table);
        }
    }
    Ok(())
}

/// Count medical and non-medical calls. Unrecognised labels count as
/// non-medical.
fn medical_split<'a>(counts: impl IntoIterator<Item = (&'a str, usize)>) -> (usize, usize) {
    counts
        .into_iter()
        .fold((0, 0), |(medical, other), (label, n)| {
            match EmergencyType::from_label(label) {
                Some(kind) if kind.is_medical() => (medical + n, other),
                _ => (medical, other + n),
            }
        })
}

/// Run the stats command: query both stores and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let rows_pool = db::connect_existing(&config.structured_store.path).await?;
    let docs_pool = db::connect_existing(&config.document_store.path).await?;
    require_tables(&rows_pool, &["incidents"]).await?;
    require_tables(&docs_pool, &["incident_details", "provider_notes"]).await?;

    let total_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM incidents")
        .fetch_one(&rows_pool)
        .await?;
    let total_docs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM incident_details")
        .fetch_one(&docs_pool)
        .await?;
    let total_notes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM provider_notes")
        .fetch_one(&docs_pool)
        .await?;
    let avg_priority: Option<f64> = sqlx::query_scalar("SELECT AVG(priority) FROM incidents")
        .fetch_one(&rows_pool)
        .await?;

    println!("Incident Sim — Store Stats");
    println!("==========================");
    println!();
    println!(
        "  Structured:  {} ({})",
        config.structured_store.path.display(),
        format_bytes(file_size(&config.structured_store.path))
    );
    println!(
        "  Documents:   {} ({})",
        config.document_store.path.display(),
        format_bytes(file_size(&config.document_store.path))
    );
    println!();
    println!("  Incidents:   {}", total_rows);
    println!("  Documents:   {}", total_docs);
    println!("  Notes:       {}", total_notes);
    println!("  Avg priority: {:.2}", avg_priority.unwrap_or(0.0));

    let by_priority = sqlx::query(
        "SELECT priority, COUNT(*) AS n FROM incidents GROUP BY priority ORDER BY priority",
    )
    .fetch_all(&rows_pool)
    .await?;
    let mut priority_counts = [0i64; 5];
    for row in &by_priority {
        let p: i64 = row.get("priority");
        if (1..=5).contains(&p) {
            priority_counts[(p - 1) as usize] = row.get("n");
        }
    }

    println!();
    println!("  By priority:");
    for (i, n) in priority_counts.iter().enumerate() {
        println!("    P{}  {:>6}", i + 1, n);
    }

    let by_type = sqlx::query(
        r#"
        SELECT emergency_type, COUNT(*) AS n, AVG(priority) AS avg_p
        FROM incidents
        GROUP BY emergency_type
        ORDER BY n DESC, emergency_type
        "#,
    )
    .fetch_all(&rows_pool)
    .await?;

    if !by_type.is_empty() {
        let mut type_counts = Vec::with_capacity(by_type.len());
        println!();
        println!("  By type:");
        println!("  {:<32} {:>6} {:>8}", "TYPE", "COUNT", "AVG P");
        println!("  {}", "-".repeat(48));
        for row in &by_type {
            let kind: String = row.get("emergency_type");
            let n: i64 = row.get("n");
            let avg: f64 = row.get("avg_p");
            println!("  {:<32} {:>6} {:>8.2}", kind, n, avg);
            type_counts.push((kind, n as usize));
        }
        let (medical, other) =
            medical_split(type_counts.iter().map(|(k, n)| (k.as_str(), *n)));
        println!();
        println!("  Medical:     {}", medical);
        println!("  Non-medical: {}", other);
    }

    println!();

    rows_pool.close().await;
    docs_pool.close().await;
    Ok(())
}

/// Print the stats of a freshly generated batch.
pub fn print_batch_stats(stats: &Stats) {
    if stats.total == 0 {
        return;
    }
    println!();
    println!("  By priority:");
    for (p, n) in &stats.by_priority {
        println!("    P{}  {:>6}", p, n);
    }
    println!("  Avg priority: {:.2}", stats.average_priority);
    println!("  By type:");
    for (kind, n) in &stats.by_type {
        println!("    {:<32} {:>6}", kind.label(), n);
    }
    let (medical, other) = medical_split(stats.by_type.iter().map(|(k, n)| (k.label(), *n)));
    println!("  Medical: {}  Non-medical: {}", medical, other);
}

fn file_size(path: &std::path::Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
