//! `incsim mapping`: print the incident → sink field mapping table.

use incident_sim_core::adapter::FIELD_MAP;

pub fn run_mapping() {
    println!(
        "{:<32} {:<20} {:>6}  {}",
        "INCIDENT FIELD", "COLUMN", "WIDTH", "DOCUMENT PATH"
    );
    println!("{}", "-".repeat(110));
    for e in FIELD_MAP.entries {
        let width = e.width.map(|w| w.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<32} {:<20} {:>6}  {}",
            e.incident_field, e.column, width, e.document_path
        );
    }
}
