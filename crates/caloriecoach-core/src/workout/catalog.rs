//! Built-in workout profiles and the catalog lookup.

use serde::{Deserialize, Serialize};

use super::profile::{Difficulty, IntensityPoint, WorkoutProfile};

/// Ordered collection of workout profiles, keyed by `WorkoutProfile::key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutCatalog {
    profiles: Vec<WorkoutProfile>,
}

impl Default for WorkoutCatalog {
    fn default() -> Self {
        Self {
            profiles: builtin_profiles(),
        }
    }
}

impl WorkoutCatalog {
    /// Built-in profiles, with `custom` entries added or replacing built-ins
    /// that share the same key.
    pub fn with_custom(custom: &[WorkoutProfile]) -> Self {
        let mut catalog = Self::default();
        for profile in custom {
            match catalog.profiles.iter_mut().find(|p| p.key == profile.key) {
                Some(existing) => *existing = profile.clone(),
                None => catalog.profiles.push(profile.clone()),
            }
        }
        catalog
    }

    pub fn get(&self, key: &str) -> Option<&WorkoutProfile> {
        let key = key.trim().to_lowercase();
        self.profiles.iter().find(|p| p.key == key)
    }

    pub fn list(&self) -> &[WorkoutProfile] {
        &self.profiles
    }

    pub fn keys(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.key.as_str()).collect()
    }
}

fn profile(
    key: &str,
    name: &str,
    description: &str,
    difficulty: Difficulty,
    met: f64,
    avg_calories_30min: u32,
    points: &[(f64, f64, f64)],
) -> WorkoutProfile {
    WorkoutProfile {
        key: key.into(),
        name: name.into(),
        description: description.into(),
        difficulty,
        met,
        avg_calories_30min,
        points: points
            .iter()
            .map(|&(t, i, hr)| IntensityPoint::new(t, i, hr))
            .collect(),
    }
}

fn builtin_profiles() -> Vec<WorkoutProfile> {
    vec![
        profile(
            "constant",
            "Steady State",
            "Same moderate effort from start to finish",
            Difficulty::Moderate,
            6.0,
            220,
            &[(0.0, 0.55, 65.0), (100.0, 0.55, 65.0)],
        ),
        profile(
            "walk",
            "Light Walk",
            "Low intensity, good for beginners or recovery days",
            Difficulty::Easy,
            3.5,
            120,
            &[
                (0.0, 0.20, 40.0),
                (10.0, 0.30, 45.0),
                (50.0, 0.35, 50.0),
                (90.0, 0.30, 45.0),
                (100.0, 0.20, 40.0),
            ],
        ),
        profile(
            "jog",
            "Moderate Jog",
            "Easy, even running at moderate intensity",
            Difficulty::Moderate,
            7.0,
            250,
            &[
                (0.0, 0.30, 50.0),
                (10.0, 0.50, 65.0),
                (20.0, 0.60, 70.0),
                (80.0, 0.60, 70.0),
                (90.0, 0.45, 60.0),
                (100.0, 0.30, 50.0),
            ],
        ),
        profile(
            "run",
            "Hard Run",
            "Fast running for maximum calorie burn",
            Difficulty::Intense,
            9.8,
            400,
            &[
                (0.0, 0.40, 55.0),
                (10.0, 0.65, 75.0),
                (20.0, 0.80, 85.0),
                (70.0, 0.80, 85.0),
                (85.0, 0.70, 75.0),
                (95.0, 0.50, 65.0),
                (100.0, 0.35, 55.0),
            ],
        ),
        profile(
            "hiit",
            "HIIT Intervals",
            "High intensity sprints alternated with recovery",
            Difficulty::VeryIntense,
            8.0,
            450,
            &[
                (0.0, 0.35, 50.0),
                (10.0, 0.50, 65.0),
                (15.0, 0.90, 90.0),
                (20.0, 0.40, 55.0),
                (25.0, 0.90, 90.0),
                (30.0, 0.40, 55.0),
                (35.0, 0.90, 90.0),
                (40.0, 0.40, 55.0),
                (45.0, 0.90, 90.0),
                (50.0, 0.40, 55.0),
                (55.0, 0.90, 90.0),
                (60.0, 0.40, 55.0),
                (65.0, 0.90, 90.0),
                (70.0, 0.40, 55.0),
                (75.0, 0.90, 90.0),
                (85.0, 0.50, 65.0),
                (95.0, 0.35, 50.0),
                (100.0, 0.25, 45.0),
            ],
        ),
        profile(
            "pyramid",
            "Progressive Pyramid",
            "Intensity climbs to a peak, then steps back down",
            Difficulty::Intense,
            8.5,
            380,
            &[
                (0.0, 0.30, 50.0),
                (15.0, 0.50, 65.0),
                (30.0, 0.65, 75.0),
                (45.0, 0.80, 85.0),
                (50.0, 0.90, 90.0),
                (60.0, 0.80, 85.0),
                (75.0, 0.65, 75.0),
                (90.0, 0.50, 65.0),
                (100.0, 0.30, 50.0),
            ],
        ),
        profile(
            "endurance",
            "Steady Endurance",
            "Medium-high intensity held for most of the session",
            Difficulty::Moderate,
            7.5,
            320,
            &[
                (0.0, 0.35, 50.0),
                (10.0, 0.55, 70.0),
                (20.0, 0.70, 75.0),
                (80.0, 0.70, 75.0),
                (90.0, 0.55, 65.0),
                (100.0, 0.35, 50.0),
            ],
        ),
    ]
}
