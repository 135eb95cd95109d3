//! Workout intensity profiles.
//!
//! A profile is a piecewise-linear trajectory of intensity and heart-rate
//! percentage over the elapsed fraction of the session.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Moderate,
    Intense,
    VeryIntense,
}

/// One point of a profile trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityPoint {
    /// Position in the session, 0.0 .. 100.0
    pub time_percent: f64,
    /// 0.0 (rest) .. 1.0 (maximum)
    pub intensity: f64,
    /// Percentage of heart-rate reserve, 0.0 .. 100.0
    pub hr_percent: f64,
}

impl IntensityPoint {
    pub const fn new(time_percent: f64, intensity: f64, hr_percent: f64) -> Self {
        Self {
            time_percent,
            intensity,
            hr_percent,
        }
    }

    /// Target heart rate for this point given the user's resting and maximum
    /// heart rate (Karvonen reserve).
    pub fn heart_rate(&self, resting_hr: f64, max_hr: f64) -> f64 {
        resting_hr + (max_hr - resting_hr) * (self.hr_percent / 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutProfile {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    /// Metabolic equivalent used by the MET calorie formula.
    pub met: f64,
    #[serde(default)]
    pub avg_calories_30min: u32,
    pub points: Vec<IntensityPoint>,
}

impl WorkoutProfile {
    /// Interpolated point at `elapsed_fraction` (clamped to 0.0 .. 1.0).
    pub fn intensity_at(&self, elapsed_fraction: f64) -> IntensityPoint {
        let Some(first) = self.points.first().copied() else {
            return IntensityPoint::new(0.0, 0.0, 0.0);
        };
        let time_percent = if elapsed_fraction.is_finite() {
            (elapsed_fraction * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        let mut before = first;
        let mut after = first;
        for (i, point) in self.points.iter().enumerate() {
            if point.time_percent <= time_percent {
                before = *point;
                after = self.points.get(i + 1).copied().unwrap_or(*point);
            } else {
                after = *point;
                break;
            }
        }

        let span = after.time_percent - before.time_percent;
        if span <= f64::EPSILON {
            return IntensityPoint { time_percent, ..before };
        }
        let t = (time_percent - before.time_percent) / span;
        IntensityPoint {
            time_percent,
            intensity: before.intensity + t * (after.intensity - before.intensity),
            hr_percent: before.hr_percent + t * (after.hr_percent - before.hr_percent),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let field = format!("profiles.{}", self.key);
        if self.key.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "profiles.key".into(),
            });
        }
        if self.points.is_empty() {
            return Err(ValidationError::InvalidValue {
                field,
                message: "profile needs at least one intensity point".into(),
            });
        }
        if !(self.met > 0.0 && self.met.is_finite()) {
            return Err(ValidationError::InvalidValue {
                field,
                message: format!("met must be positive, got {}", self.met),
            });
        }
        let mut previous = f64::NEG_INFINITY;
        for point in &self.points {
            let in_range = (0.0..=100.0).contains(&point.time_percent)
                && (0.0..=100.0).contains(&point.hr_percent)
                && (0.0..=1.0).contains(&point.intensity);
            if !in_range || point.time_percent < previous {
                return Err(ValidationError::InvalidValue {
                    field,
                    message: format!("invalid or unordered point at {}%", point.time_percent),
                });
            }
            previous = point.time_percent;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> WorkoutProfile {
        WorkoutProfile {
            key: "ramp".into(),
            name: "Ramp".into(),
            description: String::new(),
            difficulty: Difficulty::Moderate,
            met: 6.0,
            avg_calories_30min: 200,
            points: vec![
                IntensityPoint::new(0.0, 0.2, 40.0),
                IntensityPoint::new(50.0, 0.6, 80.0),
                IntensityPoint::new(100.0, 0.6, 80.0),
            ],
        }
    }

    #[test]
    fn interpolates_between_points() {
        let p = ramp().intensity_at(0.25);
        assert!((p.hr_percent - 60.0).abs() < 1e-9);
        assert!((p.intensity - 0.4).abs() < 1e-9);
    }

    #[test]
    fn clamps_outside_session() {
        let profile = ramp();
        assert_eq!(profile.intensity_at(-1.0).hr_percent, 40.0);
        assert_eq!(profile.intensity_at(3.0).hr_percent, 80.0);
        assert_eq!(profile.intensity_at(f64::NAN).hr_percent, 40.0);
    }

    #[test]
    fn heart_rate_uses_reserve() {
        let point = IntensityPoint::new(0.0, 0.5, 50.0);
        assert_eq!(point.heart_rate(70.0, 190.0), 130.0);
    }

    #[test]
    fn validate_rejects_unordered_points() {
        let mut profile = ramp();
        profile.points.swap(0, 1);
        assert!(profile.validate().is_err());
        assert!(ramp().validate().is_ok());
    }
}
