//! Fixed vocabularies used to populate incidents: medical conditions and
//! caller names.

use serde::{Deserialize, Serialize};

/// Pre-existing medical condition reported by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Diabetes Type 1")]
    DiabetesType1,
    #[serde(rename = "Diabetes Type 2")]
    DiabetesType2,
    Hypertension,
    Asthma,
    #[serde(rename = "Heart Disease")]
    HeartDisease,
    #[serde(rename = "COPD")]
    Copd,
    Epilepsy,
    Cancer,
    #[serde(rename = "Kidney Disease")]
    KidneyDisease,
    #[serde(rename = "Liver Disease")]
    LiverDisease,
    Arthritis,
    Depression,
    Anxiety,
    #[serde(rename = "Bipolar Disorder")]
    BipolarDisorder,
    Schizophrenia,
    #[serde(rename = "Alzheimer's")]
    Alzheimers,
    Dementia,
    #[serde(rename = "Parkinson's Disease")]
    ParkinsonsDisease,
    #[serde(rename = "Multiple Sclerosis")]
    MultipleSclerosis,
    Lupus,
    #[serde(rename = "Thyroid Disorder")]
    ThyroidDisorder,
    #[serde(rename = "Sleep Apnea")]
    SleepApnea,
    Obesity,
    Anemia,
    #[serde(rename = "Blood Clotting Disorder")]
    BloodClottingDisorder,
    #[serde(rename = "Severe Allergies")]
    SevereAllergies,
    #[serde(rename = "Substance Use Disorder")]
    SubstanceUseDisorder,
}

impl Condition {
    pub const ALL: [Condition; 27] = [
        Condition::DiabetesType1,
        Condition::DiabetesType2,
        Condition::Hypertension,
        Condition::Asthma,
        Condition::HeartDisease,
        Condition::Copd,
        Condition::Epilepsy,
        Condition::Cancer,
        Condition::KidneyDisease,
        Condition::LiverDisease,
        Condition::Arthritis,
        Condition::Depression,
        Condition::Anxiety,
        Condition::BipolarDisorder,
        Condition::Schizophrenia,
        Condition::Alzheimers,
        Condition::Dementia,
        Condition::ParkinsonsDisease,
        Condition::MultipleSclerosis,
        Condition::Lupus,
        Condition::ThyroidDisorder,
        Condition::SleepApnea,
        Condition::Obesity,
        Condition::Anemia,
        Condition::BloodClottingDisorder,
        Condition::SevereAllergies,
        Condition::SubstanceUseDisorder,
    ];

    /// Conditions that raise urgency for any patient-facing call.
    pub const SEVERE: [Condition; 3] = [
        Condition::HeartDisease,
        Condition::DiabetesType1,
        Condition::Epilepsy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::DiabetesType1 => "Diabetes Type 1",
            Condition::DiabetesType2 => "Diabetes Type 2",
            Condition::Hypertension => "Hypertension",
            Condition::Asthma => "Asthma",
            Condition::HeartDisease => "Heart Disease",
            Condition::Copd => "COPD",
            Condition::Epilepsy => "Epilepsy",
            Condition::Cancer => "Cancer",
            Condition::KidneyDisease => "Kidney Disease",
            Condition::LiverDisease => "Liver Disease",
            Condition::Arthritis => "Arthritis",
            Condition::Depression => "Depression",
            Condition::Anxiety => "Anxiety",
            Condition::BipolarDisorder => "Bipolar Disorder",
            Condition::Schizophrenia => "Schizophrenia",
            Condition::Alzheimers => "Alzheimer's",
            Condition::Dementia => "Dementia",
            Condition::ParkinsonsDisease => "Parkinson's Disease",
            Condition::MultipleSclerosis => "Multiple Sclerosis",
            Condition::Lupus => "Lupus",
            Condition::ThyroidDisorder => "Thyroid Disorder",
            Condition::SleepApnea => "Sleep Apnea",
            Condition::Obesity => "Obesity",
            Condition::Anemia => "Anemia",
            Condition::BloodClottingDisorder => "Blood Clotting Disorder",
            Condition::SevereAllergies => "Severe Allergies",
            Condition::SubstanceUseDisorder => "Substance Use Disorder",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(s: &str) -> Option<Condition> {
        let needle = s.trim();
        Condition::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(needle))
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda",
    "David", "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica",
    "Thomas", "Sarah", "Charles", "Karen", "Christopher", "Lisa", "Daniel", "Nancy",
    "Matthew", "Betty", "Anthony", "Sandra", "Mark", "Ashley", "Darnell", "Keisha",
    "Andre", "Tamika", "Luis", "Maria", "Jose", "Ana", "Minh", "Priya",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
    "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
    "White", "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson", "Walker",
    "Young", "Allen", "King", "Wright", "Scott", "Nguyen", "Hill", "Green", "Van Buren",
];
