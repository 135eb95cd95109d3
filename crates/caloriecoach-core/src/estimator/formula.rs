//! Closed-form calorie formulas.
//!
//! All functions here are pure: same inputs, same output, no logging.

use crate::profile::{ExerciseReading, Sex, UserProfile};

/// kJ -> kcal divisor of the heart-rate formula.
pub const KCAL_DIVISOR: f64 = 4.184;
pub const TEMPERATURE_BASELINE_C: f64 = 37.0;
pub const TEMPERATURE_FACTOR: f64 = 0.05;

/// Sex-specific constants of the heart-rate calorie formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartRateConstants {
    pub base: f64,
    pub hr_coef: f64,
    pub weight_coef: f64,
    pub age_coef: f64,
}

pub const MALE: HeartRateConstants = HeartRateConstants {
    base: -55.0969,
    hr_coef: 0.6309,
    weight_coef: 0.1988,
    age_coef: 0.2017,
};

pub const FEMALE: HeartRateConstants = HeartRateConstants {
    base: -20.4022,
    hr_coef: 0.4472,
    weight_coef: 0.1263,
    age_coef: 0.074,
};

impl HeartRateConstants {
    pub fn for_sex(sex: Sex) -> Self {
        match sex {
            Sex::Male => MALE,
            Sex::Female => FEMALE,
        }
    }
}

/// Heart-rate based calories over `duration_minutes`.
pub fn heart_rate_calories(
    sex: Sex,
    age: f64,
    weight_kg: f64,
    heart_rate_bpm: f64,
    duration_minutes: f64,
) -> f64 {
    let c = HeartRateConstants::for_sex(sex);
    ((c.base + c.hr_coef * heart_rate_bpm + c.weight_coef * weight_kg + c.age_coef * age)
        / KCAL_DIVISOR)
        * duration_minutes
}

/// MET based calories over `duration_minutes`.
pub fn met_calories(met: f64, weight_kg: f64, duration_minutes: f64) -> f64 {
    (met * weight_kg * 3.5 / 200.0) * duration_minutes
}

/// Multiplier for body temperature relative to 37 °C.
pub fn temperature_adjustment(body_temperature_c: f64) -> f64 {
    1.0 + (body_temperature_c - TEMPERATURE_BASELINE_C) * TEMPERATURE_FACTOR
}

/// Mean of the temperature-adjusted heart-rate formula and the MET formula,
/// floored at zero.
pub fn combined_calories(profile: &UserProfile, reading: &ExerciseReading, met: f64) -> f64 {
    let by_hr = heart_rate_calories(
        profile.sex(),
        f64::from(profile.age()),
        profile.weight_kg(),
        f64::from(reading.heart_rate_bpm),
        reading.duration_minutes,
    ) * temperature_adjustment(reading.body_temperature_c);
    let by_met = met_calories(met, profile.weight_kg(), reading.duration_minutes);
    ((by_hr + by_met) / 2.0).max(0.0)
}
