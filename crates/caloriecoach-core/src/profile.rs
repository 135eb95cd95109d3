//! User profile and exercise readings.
//!
//! Both types are only built through validation against the configured
//! [`InputRanges`], so downstream code can assume physiologically plausible
//! values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::InputRanges;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Binary encoding used by the model feature vector (1 = male).
    pub fn encoded(self) -> f64 {
        match self {
            Sex::Male => 1.0,
            Sex::Female => 0.0,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Sex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "masculino" | "homme" => Ok(Sex::Male),
            "f" | "female" | "femenino" | "femme" => Ok(Sex::Female),
            other => Err(ValidationError::InvalidValue {
                field: "sex".into(),
                message: format!("expected male or female, got '{other}'"),
            }),
        }
    }
}

/// Raw, unvalidated profile form input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    #[serde(default)]
    pub surname: String,
    pub sex: Sex,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
}

impl ProfileInput {
    pub fn validate(self, ranges: &InputRanges) -> Result<UserProfile, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::Empty {
                field: "name".into(),
            });
        }
        ranges.age.check("age", self.age as f64)?;
        ranges.height_cm.check("height_cm", self.height_cm)?;
        ranges.weight_kg.check("weight_kg", self.weight_kg)?;

        Ok(UserProfile {
            name,
            surname: self.surname.trim().to_string(),
            sex: self.sex,
            age: self.age,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
        })
    }
}

/// Validated user profile. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    name: String,
    surname: String,
    sex: Sex,
    age: u32,
    height_cm: f64,
    weight_kg: f64,
}

impl UserProfile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    /// Theoretical maximum heart rate (220 - age).
    pub fn max_heart_rate(&self) -> f64 {
        (220.0 - self.age as f64).max(0.0)
    }
}

/// One set of exercise measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseReading {
    pub duration_minutes: f64,
    pub heart_rate_bpm: u32,
    pub body_temperature_c: f64,
}

impl ExerciseReading {
    /// Build a reading from manual input, checking every field.
    pub fn validated(
        duration_minutes: f64,
        heart_rate_bpm: u32,
        body_temperature_c: f64,
        ranges: &InputRanges,
    ) -> Result<Self, ValidationError> {
        ranges.duration_min.check("duration_minutes", duration_minutes)?;
        ranges.heart_rate.check("heart_rate_bpm", heart_rate_bpm as f64)?;
        ranges.body_temp.check("body_temperature_c", body_temperature_c)?;
        Ok(Self {
            duration_minutes,
            heart_rate_bpm,
            body_temperature_c,
        })
    }
}
