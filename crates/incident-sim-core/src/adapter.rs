//! Projection of incidents onto sink record shapes.
//!
//! [`to_structured`] produces a flat row whose text columns are truncated to
//! their declared widths; [`to_document`] produces a nested document that
//! keeps every value intact. Both are pure and total.
//!
//! [`FIELD_MAP`] is the single source of truth for the structured columns.
//! Sinks call [`FieldMap::validate`] with their actual schema at startup.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MappingError;
use crate::models::Incident;
use crate::vitals::AgeBucket;

/// Status assigned to every newly adapted incident.
pub const DEFAULT_STATUS: &str = "dispatched";

const UNKNOWN_NAME: &str = "Unknown";
const NO_HISTORY: &str = "None";

/// A projected record and the columns that had to be shortened.
#[derive(Debug, Clone, PartialEq)]
pub struct Adapted<R> {
    pub record: R,
    pub truncated: bool,
    pub truncated_columns: Vec<&'static str>,
}

// ============ Structured projection ============

/// Flat row for the structured (SQL) sink. Field names are column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    pub incident_id: String,
    pub caller_first_name: String,
    pub caller_last_name: String,
    pub caller_age: u32,
    pub caller_sex: String,
    pub caller_phone: String,
    pub medical_history: String,
    pub age_bucket: String,
    pub location_address: String,
    pub location_area: String,
    pub location_zip: String,
    pub location_lat: f64,
    pub location_lng: f64,
    pub emergency_type: String,
    pub priority: u8,
    pub priority_factors: String,
    pub symptoms: String,
    pub blood_pressure: String,
    pub heart_rate: u16,
    pub respiratory_rate: u16,
    pub temperature: f64,
    pub oxygen_saturation: u8,
    pub mental_status: String,
    pub pain_level: u8,
    pub conscious: bool,
    pub breathing: String,
    pub circulation: String,
    pub operator_notes: String,
    pub call_timestamp: String,
    pub created_at: String,
    pub status: String,
}

/// One row of the mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Dotted path into [`Incident`].
    pub incident_field: &'static str,
    pub column: &'static str,
    /// Character width for text columns.
    pub width: Option<usize>,
    /// Dotted path into [`DocumentRecord`].
    pub document_path: &'static str,
}

const fn text(
    incident_field: &'static str,
    column: &'static str,
    width: usize,
    document_path: &'static str,
) -> FieldMapping {
    FieldMapping {
        incident_field,
        column,
        width: Some(width),
        document_path,
    }
}

const fn value(
    incident_field: &'static str,
    column: &'static str,
    document_path: &'static str,
) -> FieldMapping {
    FieldMapping {
        incident_field,
        column,
        width: None,
        document_path,
    }
}

/// Mapping table from incident fields to structured columns and document paths.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    pub entries: &'static [FieldMapping],
}

#[rustfmt::skip]
pub static FIELD_MAP: FieldMap = FieldMap {
    entries: &[
        text("id", "incident_id", 12, "incident_id"),
        text("caller.name", "caller_first_name", 50, "caller_info.name"),
        text("caller.name", "caller_last_name", 50, "caller_info.name"),
        value("caller.age", "caller_age", "caller_info.age"),
        text("caller.sex", "caller_sex", 10, "caller_info.sex"),
        text("caller.phone", "caller_phone", 15, "caller_info.phone"),
        text("caller.medical_history", "medical_history", 100, "caller_info.medical_history"),
        text("caller.age_bucket", "age_bucket", 10, "caller_info.age_bucket"),
        text("location.address", "location_address", 200, "location.address"),
        text("location.area", "location_area", 50, "location.area"),
        text("location.zip", "location_zip", 10, "location.zip"),
        value("location.coordinates.latitude", "location_lat", "location.coordinates.latitude"),
        value("location.coordinates.longitude", "location_lng", "location.coordinates.longitude"),
        text("emergency.type", "emergency_type", 100, "emergency_details.type"),
        value("emergency.priority", "priority", "emergency_details.priority"),
        text("emergency.priority_factors", "priority_factors", 50, "emergency_details.priority_factors"),
        text("emergency.symptoms", "symptoms", 255, "emergency_details.symptoms"),
        text("vitals.blood_pressure", "blood_pressure", 7, "emergency_details.vital_signs.blood_pressure"),
        value("vitals.heart_rate", "heart_rate", "emergency_details.vital_signs.heart_rate"),
        value("vitals.respiratory_rate", "respiratory_rate", "emergency_details.vital_signs.respiratory_rate"),
        value("vitals.temperature", "temperature", "emergency_details.vital_signs.temperature"),
        value("vitals.oxygen_saturation", "oxygen_saturation", "emergency_details.vital_signs.oxygen_saturation"),
        text("patient_condition.mental_status", "mental_status", 50, "patient_condition.mental_status"),
        value("patient_condition.pain_level", "pain_level", "patient_condition.pain_level"),
        value("patient_condition.conscious", "conscious", "patient_condition.conscious"),
        text("patient_condition.breathing", "breathing", 20, "patient_condition.breathing"),
        text("patient_condition.circulation", "circulation", 20, "patient_condition.circulation"),
        text("notes", "operator_notes", 500, "operator_notes"),
        value("timestamps.call_time", "call_timestamp", "call_timestamp"),
        value("timestamps.created_at", "created_at", "created_at"),
        text("(default)", "status", 50, "status"),
    ],
};

impl FieldMap {
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.column)
    }

    pub fn width(&self, column: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .and_then(|e| e.width)
    }

    /// Check the table against a sink's actual columns, in both directions.
    ///
    /// `ignored` names sink-managed columns (surrogate keys and the like)
    /// that no incident field feeds.
    pub fn validate<S: AsRef<str>>(
        &self,
        sink_columns: &[S],
        ignored: &[&str],
    ) -> Result<(), MappingError> {
        for col in sink_columns {
            let col = col.as_ref();
            if ignored.contains(&col) {
                continue;
            }
            if !self.entries.iter().any(|e| e.column == col) {
                return Err(MappingError::UnmappedColumn(col.to_string()));
            }
        }
        for column in self.columns() {
            if !sink_columns.iter().any(|c| c.as_ref() == column) {
                return Err(MappingError::MissingColumn(column.to_string()));
            }
        }
        Ok(())
    }
}

/// Shorten `s` to at most `width` characters.
pub fn truncate_chars(s: &str, width: usize) -> (String, bool) {
    match s.char_indices().nth(width) {
        Some((byte_idx, _)) => (s[..byte_idx].to_string(), true),
        None => (s.to_string(), false),
    }
}

/// Split a display name into first and last name.
pub fn split_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or(UNKNOWN_NAME).to_string();
    let rest: Vec<&str> = parts.collect();
    let last = if rest.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        rest.join(" ")
    };
    (first, last)
}

fn rfc3339(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

struct Truncator {
    columns: Vec<&'static str>,
}

impl Truncator {
    fn fit(&mut self, column: &'static str, value: String) -> String {
        let Some(width) = FIELD_MAP.width(column) else {
            return value;
        };
        let (out, cut) = truncate_chars(&value, width);
        if cut {
            self.columns.push(column);
        }
        out
    }
}

pub fn to_structured(incident: &Incident) -> Adapted<StructuredRecord> {
    let mut t = Truncator {
        columns: Vec::new(),
    };
    let caller = &incident.caller;
    let loc = &incident.location;
    let em = &incident.emergency;
    let v = &incident.vitals;
    let pc = &incident.patient_condition;
    let (first, last) = split_name(&caller.name);

    let factors: Vec<&str> = em.priority_factors.iter().map(|f| f.as_str()).collect();

    let record = StructuredRecord {
        incident_id: t.fit("incident_id", incident.id.clone()),
        caller_first_name: t.fit("caller_first_name", first),
        caller_last_name: t.fit("caller_last_name", last),
        caller_age: caller.age,
        caller_sex: t.fit("caller_sex", caller.sex.as_str().to_string()),
        caller_phone: t.fit("caller_phone", caller.phone.clone().unwrap_or_default()),
        medical_history: t.fit(
            "medical_history",
            caller
                .medical_history
                .map(|h| h.label().to_string())
                .unwrap_or_else(|| NO_HISTORY.to_string()),
        ),
        age_bucket: t.fit("age_bucket", caller.age_bucket.label().to_string()),
        location_address: t.fit("location_address", loc.address.clone()),
        location_area: t.fit("location_area", loc.area.clone()),
        location_zip: t.fit("location_zip", loc.zip.clone()),
        location_lat: loc.coordinates.latitude,
        location_lng: loc.coordinates.longitude,
        emergency_type: t.fit("emergency_type", em.kind.label().to_string()),
        priority: em.priority.get(),
        priority_factors: t.fit("priority_factors", factors.join(",")),
        symptoms: t.fit("symptoms", em.symptoms.join("; ")),
        blood_pressure: t.fit("blood_pressure", v.blood_pressure.to_string()),
        heart_rate: v.heart_rate,
        respiratory_rate: v.respiratory_rate,
        temperature: v.temperature,
        oxygen_saturation: v.oxygen_saturation,
        mental_status: t.fit("mental_status", pc.mental_status.clone()),
        pain_level: pc.pain_level,
        conscious: pc.conscious,
        breathing: t.fit("breathing", pc.breathing.clone()),
        circulation: t.fit("circulation", pc.circulation.clone()),
        operator_notes: t.fit("operator_notes", incident.notes.clone()),
        call_timestamp: rfc3339(incident.timestamps.call_time),
        created_at: rfc3339(incident.timestamps.created_at),
        status: t.fit("status", DEFAULT_STATUS.to_string()),
    };

    Adapted {
        record,
        truncated: !t.columns.is_empty(),
        truncated_columns: t.columns,
    }
}

// ============ Document projection ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub incident_id: String,
    pub caller_info: CallerInfo,
    pub location: DocumentLocation,
    pub emergency_details: EmergencyDetails,
    pub patient_condition: ConditionDetails,
    pub operator_notes: String,
    pub call_timestamp: String,
    pub created_at: String,
    pub status: String,
    pub narrative: Narrative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallerInfo {
    pub name: String,
    pub age: u32,
    pub sex: String,
    pub phone: String,
    pub medical_history: String,
    pub age_bucket: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLocation {
    pub address: String,
    pub area: String,
    pub zip: String,
    pub coordinates: crate::models::Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: u8,
    pub priority_factors: Vec<String>,
    pub symptoms: Vec<String>,
    pub vital_signs: VitalSigns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub blood_pressure: String,
    pub heart_rate: u16,
    pub respiratory_rate: u16,
    pub temperature: f64,
    pub oxygen_saturation: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDetails {
    pub mental_status: String,
    pub pain_level: u8,
    pub conscious: bool,
    pub breathing: String,
    pub circulation: String,
}

/// Human-readable extras only the document sink carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub summary: String,
    pub age_bucket_note: String,
}

fn age_bucket_note(bucket: AgeBucket) -> &'static str {
    match bucket {
        AgeBucket::Pediatric => "Pediatric patient; use pediatric dosing and equipment.",
        AgeBucket::Adult => "Adult patient.",
        AgeBucket::Elderly => "Elderly patient; consider falls risk and polypharmacy.",
    }
}

pub fn to_document(incident: &Incident) -> Adapted<DocumentRecord> {
    let caller = &incident.caller;
    let loc = &incident.location;
    let em = &incident.emergency;
    let v = &incident.vitals;
    let pc = &incident.patient_condition;

    let summary = format!(
        "Priority {} {} in {}: {}-year-old {}, {}.",
        em.priority,
        em.kind.label(),
        loc.area,
        caller.age,
        caller.sex.as_str().to_lowercase(),
        pc.mental_status.to_lowercase()
    );

    let record = DocumentRecord {
        incident_id: incident.id.clone(),
        caller_info: CallerInfo {
            name: caller.name.clone(),
            age: caller.age,
            sex: caller.sex.as_str().to_string(),
            phone: caller.phone.clone().unwrap_or_default(),
            medical_history: caller
                .medical_history
                .map(|h| h.label().to_string())
                .unwrap_or_else(|| NO_HISTORY.to_string()),
            age_bucket: caller.age_bucket.label().to_string(),
        },
        location: DocumentLocation {
            address: loc.address.clone(),
            area: loc.area.clone(),
            zip: loc.zip.clone(),
            coordinates: loc.coordinates,
        },
        emergency_details: EmergencyDetails {
            kind: em.kind.label().to_string(),
            priority: em.priority.get(),
            priority_factors: em
                .priority_factors
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
            symptoms: em.symptoms.clone(),
            vital_signs: VitalSigns {
                blood_pressure: v.blood_pressure.to_string(),
                heart_rate: v.heart_rate,
                respiratory_rate: v.respiratory_rate,
                temperature: v.temperature,
                oxygen_saturation: v.oxygen_saturation,
            },
        },
        patient_condition: ConditionDetails {
            mental_status: pc.mental_status.clone(),
            pain_level: pc.pain_level,
            conscious: pc.conscious,
            breathing: pc.breathing.clone(),
            circulation: pc.circulation.clone(),
        },
        operator_notes: incident.notes.clone(),
        call_timestamp: rfc3339(incident.timestamps.call_time),
        created_at: rfc3339(incident.timestamps.created_at),
        status: DEFAULT_STATUS.to_string(),
        narrative: Narrative {
            summary,
            age_bucket_note: age_bucket_note(caller.age_bucket).to_string(),
        },
    };

    Adapted {
        record,
        truncated: false,
        truncated_columns: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenerationContext;
    use crate::factory::IncidentFactory;
    use std::collections::BTreeSet;

    fn sample() -> Incident {
        IncidentFactory::new()
            .generate(&mut GenerationContext::seeded(21))
            .unwrap()
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("abc", 5), ("abc".to_string(), false));
        assert_eq!(truncate_chars("abcdef", 3), ("abc".to_string(), true));
        assert_eq!(truncate_chars("ñöü✓x", 4), ("ñöü✓".to_string(), true));
        assert_eq!(truncate_chars("", 0), (String::new(), false));
    }

    fn resolve<'a>(root: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
        path.split('.').try_fold(root, |v, seg| v.get(seg))
    }

    fn leaf_paths(prefix: String, v: &serde_json::Value, out: &mut Vec<String>) {
        match v.as_object() {
            Some(map) => {
                for (k, child) in map {
                    let path = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{}.{}", prefix, k)
                    };
                    leaf_paths(path, child, out);
                }
            }
            None => out.push(prefix),
        }
    }

    #[test]
    fn test_every_mapping_resolves_in_incident_and_document() {
        let inc = sample();
        let incident_json = serde_json::to_value(&inc).unwrap();
        let document_json = serde_json::to_value(to_document(&inc).record).unwrap();

        for m in FIELD_MAP.entries {
            assert!(
                resolve(&document_json, m.document_path).is_some(),
                "document path {} missing",
                m.document_path
            );
            if m.incident_field == "(default)" {
                continue;
            }
            assert!(
                resolve(&incident_json, m.incident_field).is_some(),
                "incident field {} missing",
                m.incident_field
            );
        }
    }

    #[test]
    fn test_every_incident_leaf_is_mapped() {
        let incident_json = serde_json::to_value(sample()).unwrap();
        let mut leaves = Vec::new();
        leaf_paths(String::new(), &incident_json, &mut leaves);
        assert!(!leaves.is_empty());

        for leaf in leaves {
            let covered = FIELD_MAP.entries.iter().any(|m| {
                leaf == m.incident_field || leaf.starts_with(&format!("{}.", m.incident_field))
            });
            assert!(covered, "incident field {} has no mapping", leaf);
        }
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("Maria Van Buren"), ("Maria".into(), "Van Buren".into()));
        assert_eq!(split_name("Cher"), ("Cher".into(), "Unknown".into()));
        assert_eq!(split_name("   "), ("Unknown".into(), "Unknown".into()));
    }

    #[test]
    fn test_structured_keys_match_field_map() {
        let adapted = to_structured(&sample());
        let json = serde_json::to_value(&adapted.record).unwrap();
        let keys: BTreeSet<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        let columns: BTreeSet<&str> = FIELD_MAP.columns().collect();
        assert_eq!(keys, columns);
    }

    #[test]
    fn test_long_name_truncates_last_name() {
        let mut inc = sample();
        inc.caller.name = format!("Ann {}", "X".repeat(60));
        let adapted = to_structured(&inc);
        assert!(adapted.truncated);
        assert_eq!(adapted.truncated_columns, vec!["caller_last_name"]);
        assert_eq!(adapted.record.caller_last_name.chars().count(), 50);
        assert_eq!(adapted.record.caller_first_name, "Ann");
    }

    #[test]
    fn test_generated_incident_fits_without_truncation() {
        let mut ctx = GenerationContext::seeded(22);
        let f = IncidentFactory::new();
        for _ in 0..100 {
            let inc = f.generate(&mut ctx).unwrap();
            let adapted = to_structured(&inc);
            assert!(
                !adapted.truncated_columns.contains(&"incident_id"),
                "{}",
                inc.id
            );
            assert!(!adapted.truncated_columns.contains(&"blood_pressure"));
        }
    }

    #[test]
    fn test_absent_values_use_placeholders() {
        let mut inc = sample();
        inc.caller.phone = None;
        inc.caller.medical_history = None;
        let row = to_structured(&inc).record;
        assert_eq!(row.caller_phone, "");
        assert_eq!(row.medical_history, "None");
        assert_eq!(row.status, "dispatched");
    }

    #[test]
    fn test_document_keeps_full_values() {
        let mut inc = sample();
        inc.notes = "n".repeat(800);
        let adapted = to_document(&inc);
        assert!(!adapted.truncated);
        assert_eq!(adapted.record.operator_notes.len(), 800);

        let json = serde_json::to_value(&adapted.record).unwrap();
        assert_eq!(json["emergency_details"]["type"], inc.emergency.kind.label());
        assert_eq!(
            json["emergency_details"]["vital_signs"]["blood_pressure"],
            inc.vitals.blood_pressure.to_string()
        );
        assert!(json["narrative"]["summary"].as_str().unwrap().contains(&inc.location.area));
    }

    #[test]
    fn test_validate_detects_both_directions() {
        let mut cols: Vec<&str> = FIELD_MAP.columns().collect();
        cols.push("id");
        assert!(FIELD_MAP.validate(&cols, &["id"]).is_ok());

        cols.push("dispatcher_id");
        assert_eq!(
            FIELD_MAP.validate(&cols, &["id"]),
            Err(MappingError::UnmappedColumn("dispatcher_id".into()))
        );

        let short: Vec<&str> = FIELD_MAP.columns().filter(|c| *c != "symptoms").collect();
        assert_eq!(
            FIELD_MAP.validate(&short, &[]),
            Err(MappingError::MissingColumn("symptoms".into()))
        );
    }
}
