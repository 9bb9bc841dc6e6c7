//! Emergency categories and their rule profiles.
//!
//! Each [`EmergencyType`] owns one [`CategoryProfile`] row in [`PROFILES`]:
//! base priority, which priority adjustments apply, qualifying medical
//! history, symptom vocabulary, vitals offsets, and condition hints.
//! Rows are stored in enum declaration order so lookup is an index.

use serde::{Deserialize, Serialize};

use crate::vitals::VitalsOffset;
use crate::vocab::Condition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmergencyType {
    #[serde(rename = "Cardiac Arrest")]
    CardiacArrest,
    #[serde(rename = "Heart Attack Symptoms")]
    HeartAttackSymptoms,
    #[serde(rename = "Stroke Symptoms")]
    StrokeSymptoms,
    #[serde(rename = "Unconscious/Unresponsive")]
    Unconscious,
    #[serde(rename = "DOA")]
    Doa,
    #[serde(rename = "Severe Bleeding")]
    SevereBleeding,
    #[serde(rename = "Respiratory Distress")]
    RespiratoryDistress,
    #[serde(rename = "Diabetic Emergency")]
    DiabeticEmergency,
    #[serde(rename = "Seizure Emergency")]
    SeizureEmergency,
    #[serde(rename = "Mental Health Crisis")]
    MentalHealthCrisis,
    #[serde(rename = "Pediatric Emergency")]
    PediatricEmergency,
    #[serde(rename = "Fall (Elderly)")]
    FallElderly,
    #[serde(rename = "Allergic Reaction")]
    AllergicReaction,
    #[serde(rename = "Overdose/Poisoning")]
    OverdosePoisoning,
    #[serde(rename = "Heat Stroke")]
    HeatStroke,
    Hypothermia,
    #[serde(rename = "Childbirth/Labor")]
    ChildbirthLabor,
    #[serde(rename = "Car Accident With Injuries")]
    CarAccidentWithInjuries,
    #[serde(rename = "Car Accident Without Injuries")]
    CarAccidentWithoutInjuries,
    #[serde(rename = "Mass Casualty Event")]
    MassCasualtyEvent,
    #[serde(rename = "Shooting Incident")]
    ShootingIncident,
    #[serde(rename = "Fall (Construction)")]
    FallConstruction,
    Drowning,
    #[serde(rename = "Near Drowning")]
    NearDrowning,
    #[serde(rename = "Fire-related Incident")]
    FireRelated,
    Trauma,
    #[serde(rename = "Sports Injury")]
    SportsInjury,
    #[serde(rename = "Minor Fall")]
    MinorFall,
    #[serde(rename = "Non-Emergency Transport")]
    NonEmergencyTransport,
    #[serde(rename = "Information Request")]
    InformationRequest,
    #[serde(rename = "Administrative Call")]
    AdministrativeCall,
}

/// Rule profile for one emergency category.
#[derive(Debug)]
pub struct CategoryProfile {
    pub kind: EmergencyType,
    pub label: &'static str,
    pub medical: bool,
    pub base_priority: u8,
    /// Paediatric and elderly callers are escalated one level.
    pub age_sensitive: bool,
    /// Calls between 22:00 and 05:59 local time are escalated one level.
    pub overnight_sensitive: bool,
    /// History that escalates this category, in addition to
    /// [`Condition::SEVERE`] for age-sensitive categories.
    pub qualifying_history: &'static [Condition],
    pub symptoms: &'static [&'static str],
    pub vitals_offset: VitalsOffset,
    pub mental_status: &'static [&'static str],
    /// Inclusive pain score range reported by a conscious patient.
    pub pain_range: (u8, u8),
}

const GENERIC_SYMPTOMS: &[&str] = &["General distress", "Pain"];
const GENERIC_STATUS: &[&str] = &["Alert and oriented", "Confused", "Drowsy"];
const NON_PATIENT_STATUS: &[&str] = &["Alert and oriented"];
const NO_HISTORY: &[Condition] = &[];
const CARDIAC_HISTORY: &[Condition] = &[Condition::HeartDisease, Condition::Hypertension];

#[rustfmt::skip]
pub static PROFILES: [CategoryProfile; 31] = [
    CategoryProfile {
        kind: EmergencyType::CardiacArrest,
        label: "Cardiac Arrest",
        medical: true,
        base_priority: 1,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: CARDIAC_HISTORY,
        symptoms: &["Unconscious", "No pulse", "Not breathing"],
        vitals_offset: VitalsOffset { heart_rate: -35, systolic: -45, respiratory_rate: -8, temperature: 0.0, oxygen_saturation: -20 },
        mental_status: &["Unresponsive", "Unconscious"],
        pain_range: (0, 0),
    },
    CategoryProfile {
        kind: EmergencyType::HeartAttackSymptoms,
        label: "Heart Attack Symptoms",
        medical: true,
        base_priority: 1,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: CARDIAC_HISTORY,
        symptoms: &["Chest pain", "Shortness of breath", "Sweating", "Nausea", "Left arm pain"],
        vitals_offset: VitalsOffset { heart_rate: 30, systolic: 20, respiratory_rate: 4, temperature: 0.0, oxygen_saturation: -4 },
        mental_status: &["Alert and oriented", "Anxious", "Confused"],
        pain_range: (7, 10),
    },
    CategoryProfile {
        kind: EmergencyType::StrokeSymptoms,
        label: "Stroke Symptoms",
        medical: true,
        base_priority: 1,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::Hypertension, Condition::BloodClottingDisorder, Condition::HeartDisease],
        symptoms: &["Facial drooping", "Arm weakness", "Speech difficulty", "Confusion"],
        vitals_offset: VitalsOffset { heart_rate: 5, systolic: 40, respiratory_rate: 0, temperature: 0.0, oxygen_saturation: -2 },
        mental_status: &["Confused", "Altered mental status", "Unresponsive"],
        pain_range: (3, 8),
    },
    CategoryProfile {
        kind: EmergencyType::Unconscious,
        label: "Unconscious/Unresponsive",
        medical: true,
        base_priority: 1,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::DiabetesType1, Condition::DiabetesType2, Condition::Epilepsy],
        symptoms: &["Unresponsive", "Shallow breathing", "Pale skin"],
        vitals_offset: VitalsOffset { heart_rate: -10, systolic: -15, respiratory_rate: -4, temperature: 0.0, oxygen_saturation: -8 },
        mental_status: &["Unresponsive", "Unconscious"],
        pain_range: (0, 0),
    },
    CategoryProfile {
        kind: EmergencyType::Doa,
        label: "DOA",
        medical: true,
        base_priority: 1,
        age_sensitive: false,
        overnight_sensitive: false,
        qualifying_history: NO_HISTORY,
        symptoms: &["No pulse", "Not breathing", "Cold to touch"],
        vitals_offset: VitalsOffset { heart_rate: -60, systolic: -70, respiratory_rate: -16, temperature: -6.0, oxygen_saturation: -45 },
        mental_status: &["Unresponsive"],
        pain_range: (0, 0),
    },
    CategoryProfile {
        kind: EmergencyType::SevereBleeding,
        label: "Severe Bleeding",
        medical: true,
        base_priority: 1,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::BloodClottingDisorder, Condition::Anemia],
        symptoms: &["Visible bleeding", "Pale skin", "Dizziness", "Weakness"],
        vitals_offset: VitalsOffset { heart_rate: 35, systolic: -35, respiratory_rate: 6, temperature: -0.5, oxygen_saturation: -4 },
        mental_status: &["Alert and oriented", "Confused", "Drowsy"],
        pain_range: (7, 10),
    },
    CategoryProfile {
        kind: EmergencyType::RespiratoryDistress,
        label: "Respiratory Distress",
        medical: true,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::Asthma, Condition::Copd, Condition::SleepApnea],
        symptoms: &["Difficulty breathing", "Wheezing", "Chest tightness", "Cyanosis"],
        vitals_offset: VitalsOffset { heart_rate: 25, systolic: 10, respiratory_rate: 14, temperature: 0.0, oxygen_saturation: -9 },
        mental_status: &["Alert and oriented", "Anxious", "Confused"],
        pain_range: (2, 6),
    },
    CategoryProfile {
        kind: EmergencyType::DiabeticEmergency,
        label: "Diabetic Emergency",
        medical: true,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::DiabetesType1, Condition::DiabetesType2],
        symptoms: &["Confusion", "Sweating", "Shaking", "Dizziness"],
        vitals_offset: VitalsOffset { heart_rate: 20, systolic: 0, respiratory_rate: 4, temperature: 0.0, oxygen_saturation: 0 },
        mental_status: &["Confused", "Altered mental status", "Unconscious"],
        pain_range: (0, 3),
    },
    CategoryProfile {
        kind: EmergencyType::SeizureEmergency,
        label: "Seizure Emergency",
        medical: true,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::Epilepsy],
        symptoms: &["Convulsions", "Unconscious", "Foaming at mouth", "Incontinence"],
        vitals_offset: VitalsOffset { heart_rate: 20, systolic: 10, respiratory_rate: 4, temperature: 0.5, oxygen_saturation: -5 },
        mental_status: &["Post-ictal", "Confused", "Unconscious"],
        pain_range: (0, 4),
    },
    CategoryProfile {
        kind: EmergencyType::MentalHealthCrisis,
        label: "Mental Health Crisis",
        medical: true,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: true,
        qualifying_history: &[Condition::Depression, Condition::BipolarDisorder, Condition::Schizophrenia, Condition::Anxiety],
        symptoms: &["Agitation", "Confusion", "Suicidal thoughts", "Paranoia"],
        vitals_offset: VitalsOffset { heart_rate: 15, systolic: 10, respiratory_rate: 2, temperature: 0.0, oxygen_saturation: 0 },
        mental_status: &["Agitated", "Confused", "Alert and oriented"],
        pain_range: (0, 3),
    },
    CategoryProfile {
        kind: EmergencyType::PediatricEmergency,
        label: "Pediatric Emergency",
        medical: true,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::Asthma, Condition::SevereAllergies, Condition::Epilepsy],
        symptoms: &["High fever", "Lethargy", "Vomiting", "Difficulty breathing"],
        vitals_offset: VitalsOffset { heart_rate: 20, systolic: 0, respiratory_rate: 6, temperature: 2.0, oxygen_saturation: -3 },
        mental_status: &["Alert", "Irritable", "Lethargic"],
        pain_range: (2, 7),
    },
    CategoryProfile {
        kind: EmergencyType::FallElderly,
        label: "Fall (Elderly)",
        medical: true,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::Dementia, Condition::Alzheimers, Condition::ParkinsonsDisease, Condition::Arthritis],
        symptoms: &["Hip pain", "Unable to stand", "Head injury", "Bruising"],
        vitals_offset: VitalsOffset { heart_rate: 10, systolic: 5, respiratory_rate: 2, temperature: 0.0, oxygen_saturation: 0 },
        mental_status: &["Alert and oriented", "Confused", "Drowsy"],
        pain_range: (4, 9),
    },
    CategoryProfile {
        kind: EmergencyType::AllergicReaction,
        label: "Allergic Reaction",
        medical: true,
        base_priority: 3,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::SevereAllergies, Condition::Asthma],
        symptoms: &["Hives", "Swelling", "Difficulty breathing", "Itching"],
        vitals_offset: VitalsOffset { heart_rate: 20, systolic: -20, respiratory_rate: 6, temperature: 0.0, oxygen_saturation: -5 },
        mental_status: &["Alert and oriented", "Anxious"],
        pain_range: (1, 5),
    },
    CategoryProfile {
        kind: EmergencyType::OverdosePoisoning,
        label: "Overdose/Poisoning",
        medical: true,
        base_priority: 3,
        age_sensitive: true,
        overnight_sensitive: true,
        qualifying_history: &[Condition::SubstanceUseDisorder, Condition::Depression, Condition::LiverDisease],
        symptoms: &["Drowsiness", "Slow breathing", "Pinpoint pupils", "Vomiting"],
        vitals_offset: VitalsOffset { heart_rate: -10, systolic: -10, respiratory_rate: -6, temperature: 0.0, oxygen_saturation: -8 },
        mental_status: &["Drowsy", "Confused", "Unresponsive"],
        pain_range: (0, 4),
    },
    CategoryProfile {
        kind: EmergencyType::HeatStroke,
        label: "Heat Stroke",
        medical: true,
        base_priority: 3,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::HeartDisease, Condition::KidneyDisease],
        symptoms: &["Hot dry skin", "Confusion", "Headache", "Nausea"],
        vitals_offset: VitalsOffset { heart_rate: 30, systolic: -10, respiratory_rate: 6, temperature: 5.0, oxygen_saturation: -2 },
        mental_status: &["Confused", "Drowsy", "Altered mental status"],
        pain_range: (2, 6),
    },
    CategoryProfile {
        kind: EmergencyType::Hypothermia,
        label: "Hypothermia",
        medical: true,
        base_priority: 3,
        age_sensitive: true,
        overnight_sensitive: true,
        qualifying_history: &[Condition::ThyroidDisorder, Condition::Dementia],
        symptoms: &["Shivering", "Slurred speech", "Confusion", "Weak pulse"],
        vitals_offset: VitalsOffset { heart_rate: -15, systolic: -10, respiratory_rate: -4, temperature: -6.0, oxygen_saturation: -2 },
        mental_status: &["Confused", "Drowsy", "Altered mental status"],
        pain_range: (1, 4),
    },
    CategoryProfile {
        kind: EmergencyType::ChildbirthLabor,
        label: "Childbirth/Labor",
        medical: true,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::Hypertension, Condition::DiabetesType1, Condition::DiabetesType2],
        symptoms: &["Contractions", "Water broke", "Pelvic pressure"],
        vitals_offset: VitalsOffset { heart_rate: 15, systolic: 10, respiratory_rate: 4, temperature: 0.0, oxygen_saturation: 0 },
        mental_status: &["Alert and oriented", "Anxious"],
        pain_range: (6, 10),
    },
    CategoryProfile {
        kind: EmergencyType::CarAccidentWithInjuries,
        label: "Car Accident With Injuries",
        medical: false,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::BloodClottingDisorder],
        symptoms: &["Pain", "Bleeding", "Neck/back pain", "Confusion"],
        vitals_offset: VitalsOffset { heart_rate: 25, systolic: -10, respiratory_rate: 4, temperature: 0.0, oxygen_saturation: -2 },
        mental_status: &["Confused", "Alert and oriented", "Unconscious"],
        pain_range: (6, 10),
    },
    CategoryProfile {
        kind: EmergencyType::CarAccidentWithoutInjuries,
        label: "Car Accident Without Injuries",
        medical: false,
        base_priority: 3,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: NO_HISTORY,
        symptoms: &["Anxiety", "Minor soreness"],
        vitals_offset: VitalsOffset { heart_rate: 10, systolic: 5, respiratory_rate: 2, temperature: 0.0, oxygen_saturation: 0 },
        mental_status: &["Alert and oriented", "Anxious"],
        pain_range: (0, 3),
    },
    CategoryProfile {
        kind: EmergencyType::MassCasualtyEvent,
        label: "Mass Casualty Event",
        medical: false,
        base_priority: 1,
        age_sensitive: false,
        overnight_sensitive: false,
        qualifying_history: NO_HISTORY,
        symptoms: &["Multiple patients", "Traumatic injuries", "Bleeding", "Burns"],
        vitals_offset: VitalsOffset { heart_rate: 25, systolic: -15, respiratory_rate: 6, temperature: 0.0, oxygen_saturation: -4 },
        mental_status: &["Confused", "Alert and oriented", "Unconscious"],
        pain_range: (5, 10),
    },
    CategoryProfile {
        kind: EmergencyType::ShootingIncident,
        label: "Shooting Incident",
        medical: false,
        base_priority: 1,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: NO_HISTORY,
        symptoms: &["Gunshot wound", "Bleeding", "Pale skin", "Difficulty breathing"],
        vitals_offset: VitalsOffset { heart_rate: 35, systolic: -30, respiratory_rate: 8, temperature: -0.5, oxygen_saturation: -6 },
        mental_status: &["Confused", "Alert and oriented", "Unconscious"],
        pain_range: (7, 10),
    },
    CategoryProfile {
        kind: EmergencyType::FallConstruction,
        label: "Fall (Construction)",
        medical: false,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: NO_HISTORY,
        symptoms: &["Back pain", "Head injury", "Deformity", "Unable to move legs"],
        vitals_offset: VitalsOffset { heart_rate: 20, systolic: -5, respiratory_rate: 4, temperature: 0.0, oxygen_saturation: -2 },
        mental_status: &["Alert and oriented", "Confused", "Unconscious"],
        pain_range: (6, 10),
    },
    CategoryProfile {
        kind: EmergencyType::Drowning,
        label: "Drowning",
        medical: false,
        base_priority: 1,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::Epilepsy],
        symptoms: &["Not breathing", "Cyanosis", "Unresponsive"],
        vitals_offset: VitalsOffset { heart_rate: -30, systolic: -30, respiratory_rate: -10, temperature: -3.0, oxygen_saturation: -30 },
        mental_status: &["Unresponsive", "Unconscious"],
        pain_range: (0, 0),
    },
    CategoryProfile {
        kind: EmergencyType::NearDrowning,
        label: "Near Drowning",
        medical: false,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::Epilepsy, Condition::Asthma],
        symptoms: &["Coughing", "Difficulty breathing", "Vomiting", "Chest pain"],
        vitals_offset: VitalsOffset { heart_rate: 20, systolic: 0, respiratory_rate: 10, temperature: -1.5, oxygen_saturation: -10 },
        mental_status: &["Alert and oriented", "Confused", "Drowsy"],
        pain_range: (2, 6),
    },
    CategoryProfile {
        kind: EmergencyType::FireRelated,
        label: "Fire-related Incident",
        medical: false,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::Asthma, Condition::Copd],
        symptoms: &["Burns", "Smoke inhalation", "Coughing", "Hoarse voice"],
        vitals_offset: VitalsOffset { heart_rate: 25, systolic: 5, respiratory_rate: 8, temperature: 1.0, oxygen_saturation: -8 },
        mental_status: &["Alert and oriented", "Confused", "Drowsy"],
        pain_range: (5, 10),
    },
    CategoryProfile {
        kind: EmergencyType::Trauma,
        label: "Trauma",
        medical: false,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: &[Condition::BloodClottingDisorder],
        symptoms: &["Pain", "Bleeding", "Swelling", "Deformity"],
        vitals_offset: VitalsOffset { heart_rate: 25, systolic: -10, respiratory_rate: 4, temperature: 0.0, oxygen_saturation: -2 },
        mental_status: &["Alert and oriented", "Confused", "Drowsy"],
        pain_range: (5, 10),
    },
    CategoryProfile {
        kind: EmergencyType::SportsInjury,
        label: "Sports Injury",
        medical: false,
        base_priority: 2,
        age_sensitive: true,
        overnight_sensitive: false,
        qualifying_history: NO_HISTORY,
        symptoms: &["Pain", "Swelling", "Limited mobility", "Bruising"],
        vitals_offset: VitalsOffset { heart_rate: 15, systolic: 5, respiratory_rate: 2, temperature: 0.0, oxygen_saturation: 0 },
        mental_status: &["Alert and oriented"],
        pain_range: (5, 9),
    },
    CategoryProfile {
        kind: EmergencyType::MinorFall,
        label: "Minor Fall",
        medical: true,
        base_priority: 3,
        age_sensitive: true,
        overnight_sensitive: true,
        qualifying_history: &[Condition::Arthritis, Condition::ParkinsonsDisease, Condition::Dementia],
        symptoms: &["Bruising", "Minor cut", "Wrist pain"],
        vitals_offset: VitalsOffset { heart_rate: 5, systolic: 0, respiratory_rate: 0, temperature: 0.0, oxygen_saturation: 0 },
        mental_status: &["Alert and oriented"],
        pain_range: (1, 5),
    },
    CategoryProfile {
        kind: EmergencyType::NonEmergencyTransport,
        label: "Non-Emergency Transport",
        medical: true,
        base_priority: 4,
        age_sensitive: false,
        overnight_sensitive: false,
        qualifying_history: NO_HISTORY,
        symptoms: GENERIC_SYMPTOMS,
        vitals_offset: VitalsOffset::ZERO,
        mental_status: GENERIC_STATUS,
        pain_range: (0, 3),
    },
    CategoryProfile {
        kind: EmergencyType::InformationRequest,
        label: "Information Request",
        medical: false,
        base_priority: 4,
        age_sensitive: false,
        overnight_sensitive: false,
        qualifying_history: NO_HISTORY,
        symptoms: &["No acute complaint"],
        vitals_offset: VitalsOffset::ZERO,
        mental_status: NON_PATIENT_STATUS,
        pain_range: (0, 0),
    },
    CategoryProfile {
        kind: EmergencyType::AdministrativeCall,
        label: "Administrative Call",
        medical: false,
        base_priority: 5,
        age_sensitive: false,
        overnight_sensitive: false,
        qualifying_history: NO_HISTORY,
        symptoms: &["No acute complaint"],
        vitals_offset: VitalsOffset::ZERO,
        mental_status: NON_PATIENT_STATUS,
        pain_range: (0, 0),
    },
];

impl EmergencyType {
    pub fn all() -> impl Iterator<Item = EmergencyType> {
        PROFILES.iter().map(|p| p.kind)
    }

    pub fn profile(&self) -> &'static CategoryProfile {
        &PROFILES[*self as usize]
    }

    pub fn label(&self) -> &'static str {
        self.profile().label
    }

    pub fn is_medical(&self) -> bool {
        self.profile().medical
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(s: &str) -> Option<EmergencyType> {
        let needle = s.trim();
        PROFILES
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(needle))
            .map(|p| p.kind)
    }
}

impl std::fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl CategoryProfile {
    /// Whether `history` escalates this category.
    pub fn history_qualifies(&self, history: Condition) -> bool {
        self.qualifying_history.contains(&history)
            || (self.age_sensitive && Condition::SEVERE.contains(&history))
    }
}
