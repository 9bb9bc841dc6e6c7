//! Priority classification.
//!
//! Priority starts at the category's base level and passes through the
//! ordered [`ADJUSTMENTS`] table. Each adjustment moves the level one step
//! toward urgent, only while the running level is above
//! [`ADJUSTMENT_FLOOR`]. The result can only leave this module through
//! [`Priority::clamped`], so it always lies in `1..=5`.

use serde::{Deserialize, Serialize};

use crate::category::CategoryProfile;
use crate::error::GenerationError;
use crate::vitals::AgeBucket;
use crate::vocab::Condition;

/// Dispatch priority: 1 is most urgent, 5 least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MOST_URGENT: Priority = Priority(1);
    pub const LEAST_URGENT: Priority = Priority(5);

    /// Clamp an arbitrary level into `1..=5`.
    pub fn clamped(level: i32) -> Priority {
        let lo = Priority::MOST_URGENT.0 as i32;
        let hi = Priority::LEAST_URGENT.0 as i32;
        Priority(level.max(lo).min(hi) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Priority> {
        (Priority::MOST_URGENT.0..=Priority::LEAST_URGENT.0).map(Priority)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = GenerationError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        if (Priority::MOST_URGENT.0..=Priority::LEAST_URGENT.0).contains(&v) {
            Ok(Priority(v))
        } else {
            Err(GenerationError::OutOfRange {
                field: "priority",
                value: v.to_string(),
                expected: "1..=5".to_string(),
            })
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An adjustment that fired while deriving a priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFactor {
    Age,
    Overnight,
    History,
}

impl PriorityFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityFactor::Age => "age",
            PriorityFactor::Overnight => "overnight",
            PriorityFactor::History => "history",
        }
    }
}

/// Everything the rule table looks at.
#[derive(Debug, Clone, Copy)]
pub struct PriorityInputs<'a> {
    pub profile: &'a CategoryProfile,
    pub age_bucket: AgeBucket,
    /// Local hour of the call, 0–23.
    pub local_hour: u32,
    pub medical_history: Option<Condition>,
}

/// Adjustments never push the level at or below this value.
pub const ADJUSTMENT_FLOOR: i32 = 2;

pub struct Adjustment {
    pub factor: PriorityFactor,
    pub applies: fn(&PriorityInputs<'_>) -> bool,
}

pub static ADJUSTMENTS: [Adjustment; 3] = [
    Adjustment {
        factor: PriorityFactor::Age,
        applies: age_applies,
    },
    Adjustment {
        factor: PriorityFactor::Overnight,
        applies: overnight_applies,
    },
    Adjustment {
        factor: PriorityFactor::History,
        applies: history_applies,
    },
];

fn age_applies(inputs: &PriorityInputs<'_>) -> bool {
    inputs.profile.age_sensitive && inputs.age_bucket != AgeBucket::Adult
}

fn overnight_applies(inputs: &PriorityInputs<'_>) -> bool {
    inputs.profile.overnight_sensitive && is_overnight(inputs.local_hour)
}

fn history_applies(inputs: &PriorityInputs<'_>) -> bool {
    inputs
        .medical_history
        .is_some_and(|h| inputs.profile.history_qualifies(h))
}

/// 22:00 through 05:59.
pub fn is_overnight(hour: u32) -> bool {
    hour >= 22 || hour <= 5
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityDecision {
    pub priority: Priority,
    pub factors: Vec<PriorityFactor>,
}

pub fn derive_priority(inputs: &PriorityInputs<'_>) -> PriorityDecision {
    let mut level = inputs.profile.base_priority as i32;
    let mut factors = Vec::new();

    for rule in ADJUSTMENTS.iter() {
        if level > ADJUSTMENT_FLOOR && (rule.applies)(inputs) {
            level -= 1;
            factors.push(rule.factor);
        }
    }

    PriorityDecision {
        priority: Priority::clamped(level),
        factors,
    }
}
