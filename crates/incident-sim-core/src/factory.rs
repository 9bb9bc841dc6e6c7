//! Single-incident generation.
//!
//! [`IncidentFactory::generate`] draws every attribute from the context;
//! [`IncidentFactory::generate_from`] lets the caller pin some of them.
//! Pinned values are validated, never silently replaced.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::category::{CategoryProfile, EmergencyType, PROFILES};
use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::geography;
use crate::models::{Caller, Emergency, Incident, PatientCondition, Sex, Timestamps};
use crate::priority::{derive_priority, Priority, PriorityInputs};
use crate::vitals::{sample_vitals, AgeBucket, Vitals};
use crate::vocab::{Condition, FIRST_NAMES, LAST_NAMES};

/// Probability that a caller reports no prior condition.
const NO_HISTORY_PROBABILITY: f64 = 0.3;

/// Probability that a general call involves a child.
const PEDIATRIC_CALLER_PROBABILITY: f64 = 0.08;

/// Attributes a caller may pin. Unset fields are sampled.
#[derive(Debug, Clone, Default)]
pub struct IncidentRequest {
    /// Emergency type label, matched case-insensitively.
    pub emergency_type: Option<String>,
    pub age: Option<u32>,
    pub medical_history: Option<Condition>,
    pub call_time: Option<DateTime<Utc>>,
}

impl IncidentRequest {
    pub fn of_type(label: impl Into<String>) -> Self {
        Self {
            emergency_type: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_history(mut self, history: Condition) -> Self {
        self.medical_history = Some(history);
        self
    }

    pub fn at(mut self, call_time: DateTime<Utc>) -> Self {
        self.call_time = Some(call_time);
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IncidentFactory;

impl IncidentFactory {
    pub fn new() -> Self {
        Self
    }

    /// Generate an incident with every attribute sampled.
    pub fn generate(&self, ctx: &mut GenerationContext) -> Result<Incident, GenerationError> {
        self.generate_from(ctx, &IncidentRequest::default())
    }

    /// Generate an incident honouring the pinned attributes in `request`.
    pub fn generate_from(
        &self,
        ctx: &mut GenerationContext,
        request: &IncidentRequest,
    ) -> Result<Incident, GenerationError> {
        let kind = match &request.emergency_type {
            Some(label) => EmergencyType::from_label(label)
                .ok_or_else(|| GenerationError::UnknownCategory(label.clone()))?,
            None => sample_type(ctx),
        };
        let profile = kind.profile();

        let age = match request.age {
            Some(age) => age,
            None => sample_age(ctx, kind),
        };
        let age_bucket = AgeBucket::for_age(age)?;

        let id = ctx.short_id("INC");
        let created_at = ctx.now();
        let call_time = match request.call_time {
            Some(t) => t.min(created_at),
            None => ctx.sample_call_time(created_at),
        };

        let medical_history = match request.medical_history {
            Some(h) => Some(h),
            None => sample_history(ctx),
        };

        let decision = derive_priority(&PriorityInputs {
            profile,
            age_bucket,
            local_hour: ctx.local_hour(call_time),
            medical_history,
        });

        let caller = Caller {
            name: sample_name(ctx),
            age,
            sex: sample_sex(ctx, kind),
            phone: sample_phone(ctx),
            medical_history,
            age_bucket,
        };
        let location = geography::sample_location(ctx);
        let symptoms = sample_symptoms(ctx, profile);
        let vitals = sample_vitals(ctx, age_bucket, &profile.vitals_offset);
        let patient_condition = derive_condition(ctx, profile, decision.priority, &vitals);
        let notes = narrate(kind, &caller, &symptoms, &vitals, &patient_condition);

        Ok(Incident {
            id,
            caller,
            location,
            emergency: Emergency {
                kind,
                priority: decision.priority,
                priority_factors: decision.factors,
                symptoms,
            },
            vitals,
            patient_condition,
            notes,
            timestamps: Timestamps {
                call_time,
                created_at,
            },
        })
    }
}

fn sample_type(ctx: &mut GenerationContext) -> EmergencyType {
    PROFILES
        .choose(ctx.rng())
        .map(|p| p.kind)
        .unwrap_or(EmergencyType::AdministrativeCall)
}

fn sample_age(ctx: &mut GenerationContext, kind: EmergencyType) -> u32 {
    let rng = ctx.rng();
    match kind {
        EmergencyType::PediatricEmergency => rng.gen_range(1..=17),
        EmergencyType::ChildbirthLabor => rng.gen_range(18..=44),
        EmergencyType::FallElderly => rng.gen_range(66..=98),
        _ if rng.gen_bool(PEDIATRIC_CALLER_PROBABILITY) => rng.gen_range(1..=17),
        _ => rng.gen_range(18..=95),
    }
}

fn sample_sex(ctx: &mut GenerationContext, kind: EmergencyType) -> Sex {
    match kind {
        EmergencyType::ChildbirthLabor => Sex::Female,
        _ if ctx.rng().gen_bool(0.5) => Sex::Male,
        _ => Sex::Female,
    }
}

fn sample_history(ctx: &mut GenerationContext) -> Option<Condition> {
    if ctx.rng().gen_bool(NO_HISTORY_PROBABILITY) {
        None
    } else {
        Condition::ALL.choose(ctx.rng()).copied()
    }
}

fn sample_name(ctx: &mut GenerationContext) -> String {
    let first = FIRST_NAMES.choose(ctx.rng()).copied().unwrap_or("Unknown");
    let last = LAST_NAMES.choose(ctx.rng()).copied().unwrap_or("Caller");
    format!("{} {}", first, last)
}

/// Most callers leave a callback number; some calls come from blocked lines.
fn sample_phone(ctx: &mut GenerationContext) -> Option<String> {
    let rng = ctx.rng();
    if rng.gen_bool(0.1) {
        return None;
    }
    Some(format!("(804) 555-{:04}", rng.gen_range(0..10_000)))
}

/// A non-empty subset of the category's symptoms, vocabulary order kept.
fn sample_symptoms(ctx: &mut GenerationContext, profile: &CategoryProfile) -> Vec<String> {
    let vocab = profile.symptoms;
    let min = vocab.len().min(2);
    let count = ctx.rng().gen_range(min..=vocab.len());
    let mut picked: Vec<usize> = rand::seq::index::sample(ctx.rng(), vocab.len(), count).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| vocab[i].to_string()).collect()
}

const UNRESPONSIVE_STATES: [&str; 3] = ["Unconscious", "Unresponsive", "Post-ictal"];

/// Condition follows the category, then is forced by the vitals: critical
/// hypoxia or circulatory collapse means an unresponsive patient.
fn derive_condition(
    ctx: &mut GenerationContext,
    profile: &CategoryProfile,
    priority: Priority,
    vitals: &Vitals,
) -> PatientCondition {
    let collapsed = vitals.oxygen_saturation < 80 || vitals.blood_pressure.systolic < 70;
    let mental_status = if collapsed {
        "Unresponsive".to_string()
    } else {
        profile
            .mental_status
            .choose(ctx.rng())
            .copied()
            .unwrap_or("Alert and oriented")
            .to_string()
    };
    let conscious = !UNRESPONSIVE_STATES.contains(&mental_status.as_str());

    let pain_level = if conscious {
        let (lo, hi) = profile.pain_range;
        let base = ctx.rng().gen_range(lo..=hi);
        // Priority 1 calls report at least moderate pain when pain applies.
        if priority == Priority::MOST_URGENT && hi > 0 {
            base.max(lo.max(5).min(hi))
        } else {
            base
        }
    } else {
        0
    };

    let rr = vitals.respiratory_rate;
    let breathing = if !(10..=24).contains(&rr) {
        "Labored"
    } else {
        "Normal"
    };
    let circulation = if vitals.blood_pressure.systolic < 90 || vitals.heart_rate > 130 {
        "Poor"
    } else {
        "Normal"
    };

    PatientCondition {
        mental_status,
        pain_level,
        conscious,
        breathing: breathing.to_string(),
        circulation: circulation.to_string(),
    }
}

fn narrate(
    kind: EmergencyType,
    caller: &Caller,
    symptoms: &[String],
    vitals: &Vitals,
    condition: &PatientCondition,
) -> String {
    let opening = match kind {
        EmergencyType::CardiacArrest => format!(
            "Caller reports {} is unresponsive and not breathing. CPR instructions given.",
            caller.name
        ),
        EmergencyType::HeartAttackSymptoms => format!(
            "{} reports severe chest pain radiating to left arm.",
            caller.name
        ),
        EmergencyType::StrokeSymptoms => format!(
            "Caller noticed {} has facial drooping and slurred speech.",
            caller.name
        ),
        EmergencyType::CarAccidentWithInjuries => format!(
            "Vehicle collision reported. {} complaining of neck and back pain.",
            caller.name
        ),
        EmergencyType::MentalHealthCrisis => format!(
            "{} is in acute distress and currently agitated. No weapons reported.",
            caller.name
        ),
        _ => format!(
            "Caller {} reports {}.",
            caller.name,
            kind.label().to_lowercase()
        ),
    };

    let main_symptoms: Vec<&str> = symptoms.iter().take(2).map(|s| s.as_str()).collect();

    format!(
        "{} Patient is {}. Main symptoms: {}. BP: {}, HR: {}, SpO2: {}%. Pain level: {}/10.",
        opening,
        condition.mental_status.to_lowercase(),
        main_symptoms.join(", "),
        vitals.blood_pressure,
        vitals.heart_rate,
        vitals.oxygen_saturation,
        condition.pain_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Clock;
    use crate::priority::PriorityFactor;
    use chrono::TimeZone;

    fn ctx_at(seed: u64, hour_utc: u32) -> GenerationContext {
        GenerationContext::seeded(seed).with_clock(Clock::Fixed(
            Utc.with_ymd_and_hms(2024, 1, 15, hour_utc, 30, 0).unwrap(),
        ))
    }

    #[test]
    fn test_same_seed_same_incident() {
        let f = IncidentFactory::new();
        let a = f.generate(&mut ctx_at(42, 14)).unwrap();
        let b = f.generate(&mut ctx_at(42, 14)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let f = IncidentFactory::new();
        let a = f.generate(&mut ctx_at(1, 14)).unwrap();
        let b = f.generate(&mut ctx_at(2, 14)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let f = IncidentFactory::new();
        let err = f
            .generate_from(&mut ctx_at(1, 14), &IncidentRequest::of_type("Alien Abduction"))
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::UnknownCategory("Alien Abduction".to_string())
        );
    }

    #[test]
    fn test_age_out_of_range_is_rejected() {
        let f = IncidentFactory::new();
        let err = f
            .generate_from(
                &mut ctx_at(1, 14),
                &IncidentRequest::of_type("Trauma").with_age(130),
            )
            .unwrap_err();
        assert!(matches!(err, GenerationError::OutOfRange { field: "age", .. }));
    }

    #[test]
    fn test_cardiac_arrest_adult_with_history() {
        let f = IncidentFactory::new();
        let req = IncidentRequest::of_type("Cardiac Arrest")
            .with_age(50)
            .with_history(Condition::HeartDisease);
        let inc = f.generate_from(&mut ctx_at(3, 14), &req).unwrap();
        assert_eq!(inc.emergency.priority.get(), 1);
        assert_eq!(inc.emergency.kind, EmergencyType::CardiacArrest);
        assert_eq!(inc.caller.age_bucket, AgeBucket::Adult);
    }

    #[test]
    fn test_administrative_call_stays_five_overnight() {
        let f = IncidentFactory::new();
        // 07:30 UTC is 02:30 local.
        let mut ctx = ctx_at(4, 7);
        let req = IncidentRequest::of_type("Administrative Call").with_age(40);
        let inc = f.generate_from(&mut ctx, &req).unwrap();
        assert_eq!(inc.emergency.priority.get(), 5);
        assert!(inc.emergency.priority_factors.is_empty());
    }

    #[test]
    fn test_overnight_rule_uses_local_call_time() {
        let f = IncidentFactory::new();
        let call = Utc.with_ymd_and_hms(2024, 1, 15, 4, 0, 0).unwrap(); // 23:00 local
        let mut ctx = ctx_at(5, 14);
        let req = IncidentRequest::of_type("Overdose/Poisoning")
            .with_age(30)
            .with_history(Condition::Asthma)
            .at(call);
        let inc = f.generate_from(&mut ctx, &req).unwrap();
        assert_eq!(inc.timestamps.call_time, call);
        assert_eq!(inc.emergency.priority.get(), 2);
        assert_eq!(inc.emergency.priority_factors, vec![PriorityFactor::Overnight]);
    }

    #[test]
    fn test_call_time_never_after_creation() {
        let f = IncidentFactory::new();
        let mut ctx = ctx_at(6, 14);
        let future = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let inc = f
            .generate_from(&mut ctx, &IncidentRequest::default().at(future))
            .unwrap();
        assert!(inc.timestamps.call_time <= inc.timestamps.created_at);
    }

    #[test]
    fn test_generated_fields_are_consistent() {
        let f = IncidentFactory::new();
        let mut ctx = ctx_at(7, 14);
        for _ in 0..300 {
            let inc = f.generate(&mut ctx).unwrap();
            let profile = inc.emergency.kind.profile();
            assert_eq!(AgeBucket::for_age(inc.caller.age).unwrap(), inc.caller.age_bucket);
            assert!(inc.vitals.within_envelope(), "{:?}", inc.vitals);
            assert!(!inc.emergency.symptoms.is_empty());
            for s in &inc.emergency.symptoms {
                assert!(profile.symptoms.contains(&s.as_str()));
            }
            assert!(geography::within_city(&inc.location.coordinates));
            assert!(inc.patient_condition.pain_level <= 10);
            if !inc.patient_condition.conscious {
                assert_eq!(inc.patient_condition.pain_level, 0);
            }
            assert!(inc.notes.contains(&inc.vitals.blood_pressure.to_string()));
            assert!(inc.id.starts_with("INC"));
        }
    }

    #[test]
    fn test_pediatric_emergency_has_child_caller() {
        let f = IncidentFactory::new();
        let mut ctx = ctx_at(8, 14);
        for _ in 0..50 {
            let inc = f
                .generate_from(&mut ctx, &IncidentRequest::of_type("pediatric emergency"))
                .unwrap();
            assert_eq!(inc.caller.age_bucket, AgeBucket::Pediatric);
        }
    }

    #[test]
    fn test_childbirth_caller_is_female_adult() {
        let f = IncidentFactory::new();
        let mut ctx = ctx_at(9, 14);
        for _ in 0..200 {
            let inc = f
                .generate_from(&mut ctx, &IncidentRequest::of_type("Childbirth/Labor"))
                .unwrap();
            assert_eq!(inc.caller.sex, Sex::Female);
            assert_eq!(inc.caller.age_bucket, AgeBucket::Adult);
        }
    }
}
