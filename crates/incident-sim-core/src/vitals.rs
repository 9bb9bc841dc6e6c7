//! Age-bucketed vital sign sampling.
//!
//! A reading is sampled inside the bucket's normal range, shifted by the
//! category's [`VitalsOffset`], then clamped to the physiological
//! [`ENVELOPE`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::context::GenerationContext;
use crate::error::GenerationError;

/// Oldest representable caller age.
pub const MAX_AGE: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    Pediatric,
    Adult,
    Elderly,
}

impl AgeBucket {
    /// Pediatric 0–17, adult 18–65, elderly 66–120.
    pub fn for_age(age: u32) -> Result<AgeBucket, GenerationError> {
        match age {
            0..=17 => Ok(AgeBucket::Pediatric),
            18..=65 => Ok(AgeBucket::Adult),
            66..=MAX_AGE => Ok(AgeBucket::Elderly),
            _ => Err(GenerationError::OutOfRange {
                field: "age",
                value: age.to_string(),
                expected: format!("0..={}", MAX_AGE),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::Pediatric => "pediatric",
            AgeBucket::Adult => "adult",
            AgeBucket::Elderly => "elderly",
        }
    }

    /// Normal resting ranges for this bucket.
    pub fn normal_ranges(&self) -> &'static VitalRanges {
        match self {
            AgeBucket::Pediatric => &PEDIATRIC,
            AgeBucket::Adult => &ADULT,
            AgeBucket::Elderly => &ELDERLY,
        }
    }
}

/// Inclusive ranges for each sampled vital.
#[derive(Debug)]
pub struct VitalRanges {
    pub systolic: (i32, i32),
    /// Gap between systolic and diastolic pressure.
    pub pulse_pressure: (i32, i32),
    pub heart_rate: (i32, i32),
    pub respiratory_rate: (i32, i32),
    pub temperature: (f64, f64),
    pub oxygen_saturation: (i32, i32),
}

const PEDIATRIC: VitalRanges = VitalRanges {
    systolic: (90, 120),
    pulse_pressure: (30, 45),
    heart_rate: (70, 120),
    respiratory_rate: (16, 24),
    temperature: (97.0, 99.5),
    oxygen_saturation: (95, 100),
};

const ADULT: VitalRanges = VitalRanges {
    systolic: (100, 140),
    pulse_pressure: (30, 50),
    heart_rate: (60, 100),
    respiratory_rate: (12, 20),
    temperature: (97.0, 99.0),
    oxygen_saturation: (95, 100),
};

const ELDERLY: VitalRanges = VitalRanges {
    systolic: (110, 160),
    pulse_pressure: (40, 60),
    heart_rate: (50, 90),
    respiratory_rate: (14, 22),
    temperature: (96.8, 99.2),
    oxygen_saturation: (93, 100),
};

/// Physiologically plausible bounds applied after offsets.
pub const ENVELOPE: VitalRanges = VitalRanges {
    systolic: (50, 250),
    pulse_pressure: (10, 100),
    heart_rate: (30, 220),
    respiratory_rate: (4, 60),
    temperature: (85.0, 110.0),
    oxygen_saturation: (50, 100),
};

/// Diastolic bounds; diastolic must also stay below systolic.
pub const MIN_DIASTOLIC: i32 = 20;
pub const MAX_DIASTOLIC: i32 = 150;

/// Category-specific shift applied to a sampled reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalsOffset {
    pub heart_rate: i32,
    pub systolic: i32,
    pub respiratory_rate: i32,
    pub temperature: f64,
    pub oxygen_saturation: i32,
}

impl VitalsOffset {
    pub const ZERO: VitalsOffset = VitalsOffset {
        heart_rate: 0,
        systolic: 0,
        respiratory_rate: 0,
        temperature: 0.0,
        oxygen_saturation: 0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl std::fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub blood_pressure: BloodPressure,
    pub heart_rate: u16,
    pub respiratory_rate: u16,
    /// Degrees Fahrenheit, one decimal.
    pub temperature: f64,
    /// Percent.
    pub oxygen_saturation: u8,
}

impl Vitals {
    /// Whether every reading lies inside [`ENVELOPE`].
    pub fn within_envelope(&self) -> bool {
        let in_range = |v: i32, (lo, hi): (i32, i32)| v >= lo && v <= hi;
        let bp = self.blood_pressure;
        in_range(bp.systolic as i32, ENVELOPE.systolic)
            && in_range(bp.diastolic as i32, (MIN_DIASTOLIC, MAX_DIASTOLIC))
            && bp.diastolic < bp.systolic
            && in_range(self.heart_rate as i32, ENVELOPE.heart_rate)
            && in_range(self.respiratory_rate as i32, ENVELOPE.respiratory_rate)
            && self.temperature >= ENVELOPE.temperature.0
            && self.temperature <= ENVELOPE.temperature.1
            && in_range(self.oxygen_saturation as i32, ENVELOPE.oxygen_saturation)
    }
}

fn sample_i32(ctx: &mut GenerationContext, (lo, hi): (i32, i32)) -> i32 {
    ctx.rng().gen_range(lo..=hi)
}

fn clamp_to(v: i32, (lo, hi): (i32, i32)) -> i32 {
    v.clamp(lo, hi)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Sample a reading for `bucket`, then apply `offset` and clamp.
pub fn sample_vitals(
    ctx: &mut GenerationContext,
    bucket: AgeBucket,
    offset: &VitalsOffset,
) -> Vitals {
    let ranges = bucket.normal_ranges();

    let systolic = clamp_to(
        sample_i32(ctx, ranges.systolic) + offset.systolic,
        ENVELOPE.systolic,
    );
    let gap = sample_i32(ctx, ranges.pulse_pressure);
    let diastolic = (systolic - gap)
        .clamp(MIN_DIASTOLIC, MAX_DIASTOLIC)
        .min(systolic - 1);

    let heart_rate = clamp_to(
        sample_i32(ctx, ranges.heart_rate) + offset.heart_rate,
        ENVELOPE.heart_rate,
    );
    let respiratory_rate = clamp_to(
        sample_i32(ctx, ranges.respiratory_rate) + offset.respiratory_rate,
        ENVELOPE.respiratory_rate,
    );
    let (t_lo, t_hi) = ranges.temperature;
    let temperature = round1(
        (ctx.rng().gen_range(t_lo..=t_hi) + offset.temperature)
            .clamp(ENVELOPE.temperature.0, ENVELOPE.temperature.1),
    );
    let oxygen_saturation = clamp_to(
        sample_i32(ctx, ranges.oxygen_saturation) + offset.oxygen_saturation,
        ENVELOPE.oxygen_saturation,
    );

    Vitals {
        blood_pressure: BloodPressure {
            systolic: systolic as u16,
            diastolic: diastolic as u16,
        },
        heart_rate: heart_rate as u16,
        respiratory_rate: respiratory_rate as u16,
        temperature,
        oxygen_saturation: oxygen_saturation as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::EmergencyType;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(AgeBucket::for_age(0).unwrap(), AgeBucket::Pediatric);
        assert_eq!(AgeBucket::for_age(17).unwrap(), AgeBucket::Pediatric);
        assert_eq!(AgeBucket::for_age(18).unwrap(), AgeBucket::Adult);
        assert_eq!(AgeBucket::for_age(65).unwrap(), AgeBucket::Adult);
        assert_eq!(AgeBucket::for_age(66).unwrap(), AgeBucket::Elderly);
        assert_eq!(AgeBucket::for_age(120).unwrap(), AgeBucket::Elderly);
    }

    #[test]
    fn test_age_beyond_buckets_is_out_of_range() {
        let err = AgeBucket::for_age(121).unwrap_err();
        assert!(matches!(err, GenerationError::OutOfRange { field: "age", .. }));
    }

    #[test]
    fn test_unshifted_readings_stay_in_bucket_range() {
        let mut ctx = GenerationContext::seeded(5);
        for bucket in [AgeBucket::Pediatric, AgeBucket::Adult, AgeBucket::Elderly] {
            let r = bucket.normal_ranges();
            for _ in 0..200 {
                let v = sample_vitals(&mut ctx, bucket, &VitalsOffset::ZERO);
                let hr = v.heart_rate as i32;
                assert!(hr >= r.heart_rate.0 && hr <= r.heart_rate.1, "{:?} hr {}", bucket, hr);
                let sys = v.blood_pressure.systolic as i32;
                assert!(sys >= r.systolic.0 && sys <= r.systolic.1);
                assert!(v.temperature >= r.temperature.0 && v.temperature <= r.temperature.1);
            }
        }
    }

    #[test]
    fn test_offsets_never_leave_envelope() {
        let mut ctx = GenerationContext::seeded(9);
        for kind in EmergencyType::all() {
            for bucket in [AgeBucket::Pediatric, AgeBucket::Adult, AgeBucket::Elderly] {
                for _ in 0..50 {
                    let v = sample_vitals(&mut ctx, bucket, &kind.profile().vitals_offset);
                    assert!(v.within_envelope(), "{} {:?}: {:?}", kind, bucket, v);
                }
            }
        }
    }

    #[test]
    fn test_blood_pressure_display() {
        let bp = BloodPressure {
            systolic: 120,
            diastolic: 80,
        };
        assert_eq!(bp.to_string(), "120/80");
    }
}
