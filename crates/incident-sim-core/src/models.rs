//! Core data models for generated incidents.
//!
//! An [`Incident`] is built once by the
//! [`IncidentFactory`](crate::factory::IncidentFactory) and never edited
//! afterwards. Follow-up information is recorded as new
//! [`ProviderNote`]s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::EmergencyType;
use crate::priority::{Priority, PriorityFactor};
use crate::vitals::{AgeBucket, Vitals};
use crate::vocab::Condition;

/// One synthetic emergency call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub caller: Caller,
    pub location: Location,
    pub emergency: Emergency,
    pub vitals: Vitals,
    pub patient_condition: PatientCondition,
    pub notes: String,
    pub timestamps: Timestamps,
}

/// Caller (and patient) demographics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caller {
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub phone: Option<String>,
    pub medical_history: Option<Condition>,
    pub age_bucket: AgeBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub area: String,
    pub zip: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Classification of the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emergency {
    #[serde(rename = "type")]
    pub kind: EmergencyType,
    pub priority: Priority,
    /// Adjustments that fired while deriving `priority`, in rule order.
    pub priority_factors: Vec<PriorityFactor>,
    pub symptoms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientCondition {
    pub mental_status: String,
    /// 0 (none) to 10 (worst).
    pub pain_level: u8,
    pub conscious: bool,
    pub breathing: String,
    pub circulation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timestamps {
    pub call_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Kind of follow-up note a field provider records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteKind {
    Arrival,
    Assessment,
    Treatment,
    Transport,
    Handoff,
    Complication,
}

impl NoteKind {
    pub const ALL: [NoteKind; 6] = [
        NoteKind::Arrival,
        NoteKind::Assessment,
        NoteKind::Treatment,
        NoteKind::Transport,
        NoteKind::Handoff,
        NoteKind::Complication,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NoteKind::Arrival => "Unit Arrival",
            NoteKind::Assessment => "Patient Assessment",
            NoteKind::Treatment => "Treatment Provided",
            NoteKind::Transport => "Transport Decision",
            NoteKind::Handoff => "Hospital Handoff",
            NoteKind::Complication => "Complication/Issue",
        }
    }

    pub fn urgency(&self) -> NoteUrgency {
        match self {
            NoteKind::Arrival | NoteKind::Handoff => NoteUrgency::Low,
            NoteKind::Assessment | NoteKind::Transport => NoteUrgency::Medium,
            NoteKind::Treatment => NoteUrgency::High,
            NoteKind::Complication => NoteUrgency::Critical,
        }
    }

    pub fn requires_followup(&self) -> bool {
        matches!(self, NoteKind::Treatment | NoteKind::Complication)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoteUrgency {
    Low,
    Medium,
    High,
    Critical,
}

impl NoteUrgency {
    pub fn is_urgent(&self) -> bool {
        matches!(self, NoteUrgency::High | NoteUrgency::Critical)
    }
}

/// A field provider's note attached to an incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderNote {
    pub id: String,
    pub incident_id: String,
    /// Crew that responded; every note in one timeline shares it.
    pub crew_id: String,
    /// Provider who wrote the note.
    pub created_by: String,
    pub kind: NoteKind,
    pub urgency: NoteUrgency,
    pub content: String,
    pub requires_followup: bool,
    pub recorded_at: DateTime<Utc>,
}
