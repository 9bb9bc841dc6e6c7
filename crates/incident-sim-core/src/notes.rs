//! Follow-up notes recorded by field providers after dispatch.
//!
//! Notes are derived from an existing [`Incident`] and never modify it.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::context::GenerationContext;
use crate::models::{Incident, NoteKind, ProviderNote};
use crate::priority::Priority;
use crate::vocab::{FIRST_NAMES, LAST_NAMES};

const HOSPITALS: &[&str] = &[
    "VCU Medical Center",
    "Chippenham Hospital",
    "Henrico Doctors' Hospital",
    "St. Mary's Hospital",
    "Richmond Community Hospital",
];

const PROVIDER_ROLES: &[&str] = &["Paramedic", "EMT", "AEMT"];

const SCENE_CONDITIONS: &[&str] = &["safe", "controlled", "chaotic", "well-lit", "dark"];
const TRANSPORT_MODES: &[&str] = &["ALS transport", "BLS transport", "Air medical"];
const STAFF_ROLES: &[&str] = &["ED physician", "Charge nurse", "Trauma attending", "Resident"];
const DEPARTMENTS: &[&str] = &["ED", "ICU", "Cardiology", "Trauma"];
const COMPLICATIONS: &[&str] = &[
    "sudden drop in blood pressure",
    "airway compromise",
    "recurrent arrhythmia",
    "decreasing level of consciousness",
];

const TREATMENTS: &[&str] = &[
    "Oxygen therapy",
    "IV access",
    "Cardiac monitoring",
    "Splinting",
    "Wound care",
    "Airway management",
    "Pain management",
    "Fluid resuscitation",
];

/// Kinds recorded for every incident, in clinical order.
pub const BASE_SEQUENCE: [NoteKind; 5] = [
    NoteKind::Arrival,
    NoteKind::Assessment,
    NoteKind::Treatment,
    NoteKind::Transport,
    NoteKind::Handoff,
];

/// The unit and provider that answered an incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCrew {
    pub crew_id: String,
    /// Unit call sign, e.g. `M-042`.
    pub unit: String,
    /// Role and name of the note author, e.g. `Paramedic Maria Lopez`.
    pub provider: String,
}

impl ResponseCrew {
    pub fn sample(ctx: &mut GenerationContext) -> Self {
        let crew_id = ctx.short_id("CREW");
        let unit = format!("M-{:03}", ctx.rng().gen_range(1..=999));
        let provider = format!(
            "{} {} {}",
            pick(ctx, PROVIDER_ROLES),
            pick(ctx, FIRST_NAMES),
            pick(ctx, LAST_NAMES)
        );
        Self {
            crew_id,
            unit,
            provider,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderNoteFactory;

impl ProviderNoteFactory {
    pub fn new() -> Self {
        Self
    }

    /// One note about `incident` from a freshly sampled crew. A random kind
    /// is used when `kind` is `None`.
    pub fn generate(
        &self,
        ctx: &mut GenerationContext,
        incident: &Incident,
        kind: Option<NoteKind>,
    ) -> ProviderNote {
        let kind = match kind {
            Some(k) => k,
            None => NoteKind::ALL
                .choose(ctx.rng())
                .copied()
                .unwrap_or(NoteKind::Assessment),
        };
        let crew = ResponseCrew::sample(ctx);
        let recorded_at = incident.timestamps.call_time
            + Duration::minutes(ctx.rng().gen_range(4..=45));
        self.note_at(ctx, incident, &crew, kind, recorded_at)
    }

    /// `n` notes in clinical order at increasing times after the call, all
    /// written by one sampled crew.
    pub fn timeline(
        &self,
        ctx: &mut GenerationContext,
        incident: &Incident,
        n: usize,
    ) -> Vec<ProviderNote> {
        let crew = ResponseCrew::sample(ctx);
        self.timeline_for(ctx, incident, &crew, n)
    }

    /// Like [`timeline`](Self::timeline) with the crew chosen by the caller.
    pub fn timeline_for(
        &self,
        ctx: &mut GenerationContext,
        incident: &Incident,
        crew: &ResponseCrew,
        n: usize,
    ) -> Vec<ProviderNote> {
        let kinds = timeline_kinds(incident.emergency.priority, n);
        let mut at = incident.timestamps.call_time;
        let mut notes = Vec::with_capacity(kinds.len());

        for (i, kind) in kinds.into_iter().enumerate() {
            let step = if i == 0 { 4..=12 } else { 2..=10 };
            at += Duration::minutes(ctx.rng().gen_range(step));
            notes.push(self.note_at(ctx, incident, crew, kind, at));
        }
        notes
    }

    fn note_at(
        &self,
        ctx: &mut GenerationContext,
        incident: &Incident,
        crew: &ResponseCrew,
        kind: NoteKind,
        recorded_at: DateTime<Utc>,
    ) -> ProviderNote {
        let content = render(ctx, incident, crew, kind, recorded_at);
        let urgency = kind.urgency();
        ProviderNote {
            id: ctx.short_id("NOTE"),
            incident_id: incident.id.clone(),
            crew_id: crew.crew_id.clone(),
            created_by: crew.provider.clone(),
            kind,
            urgency,
            content,
            requires_followup: kind.requires_followup(),
            recorded_at,
        }
    }
}

/// Treatment precedes any complication; extra notes become reassessments
/// before transport. Short timelines are prefixes of the full one.
fn timeline_kinds(priority: Priority, n: usize) -> Vec<NoteKind> {
    if n <= BASE_SEQUENCE.len() {
        return BASE_SEQUENCE[..n].to_vec();
    }

    let mut kinds = vec![NoteKind::Arrival, NoteKind::Assessment, NoteKind::Treatment];
    let mut extra = n - BASE_SEQUENCE.len();
    if priority == Priority::MOST_URGENT {
        kinds.push(NoteKind::Complication);
        extra -= 1;
    }
    kinds.extend(std::iter::repeat(NoteKind::Assessment).take(extra));
    kinds.push(NoteKind::Transport);
    kinds.push(NoteKind::Handoff);
    kinds
}

fn pick(ctx: &mut GenerationContext, words: &'static [&'static str]) -> &'static str {
    words.choose(ctx.rng()).copied().unwrap_or_default()
}

fn render(
    ctx: &mut GenerationContext,
    incident: &Incident,
    crew: &ResponseCrew,
    kind: NoteKind,
    at: DateTime<Utc>,
) -> String {
    let v = &incident.vitals;
    let cond = &incident.patient_condition;
    let local = at.with_timezone(&ctx.utc_offset()).format("%H:%M");

    match kind {
        NoteKind::Arrival => format!(
            "Unit {} arrived on scene at {}. Scene appears {}.",
            crew.unit,
            local,
            pick(ctx, SCENE_CONDITIONS)
        ),
        NoteKind::Assessment => format!(
            "Patient {}. Vital signs: BP {}, HR {}, RR {}, O2 {}%. Breathing {}, circulation {}.",
            cond.mental_status.to_lowercase(),
            v.blood_pressure,
            v.heart_rate,
            v.respiratory_rate,
            v.oxygen_saturation,
            cond.breathing.to_lowercase(),
            cond.circulation.to_lowercase()
        ),
        NoteKind::Treatment => {
            let count = ctx.rng().gen_range(1..=3);
            let picked: Vec<&str> = TREATMENTS
                .choose_multiple(ctx.rng(), count)
                .copied()
                .collect();
            format!(
                "Treatment initiated for {}: {}.",
                incident.emergency.kind.label().to_lowercase(),
                picked.join(", ")
            )
        }
        NoteKind::Transport => format!(
            "Patient transported to {} via {}. ETA {} minutes.",
            pick(ctx, HOSPITALS),
            pick(ctx, TRANSPORT_MODES),
            ctx.rng().gen_range(5..=25)
        ),
        NoteKind::Handoff => format!(
            "Report given to {} at {}. Patient admitted to {}.",
            pick(ctx, STAFF_ROLES),
            local,
            pick(ctx, DEPARTMENTS)
        ),
        NoteKind::Complication => format!(
            "Complication noted: {}. Additional interventions required.",
            pick(ctx, COMPLICATIONS)
        ),
    }
}
