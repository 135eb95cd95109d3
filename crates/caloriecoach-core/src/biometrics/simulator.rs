use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;

use crate::profile::{ExerciseReading, UserProfile};
use crate::storage::TrainingConfig;
use crate::workout::WorkoutProfile;

/// Heart rate treated as "no exertion" by the temperature model.
const TEMPERATURE_HR_BASELINE: f64 = 60.0;

/// Produces plausible sensor readings from the elapsed fraction of a session.
///
/// Each sample is independent of the previous one; the only state is the
/// PCG generator, so a fixed seed yields the same readings in the same order.
#[derive(Debug, Clone)]
pub struct BiometricSimulator {
    profile: WorkoutProfile,
    rng: Mcg128Xsl64,
    resting_hr: f64,
    max_hr: f64,
    hr_min: f64,
    hr_max: f64,
    hr_jitter: i64,
    temp_base: f64,
    temp_min: f64,
    temp_max: f64,
    temp_jitter: f64,
    age: u32,
    weight_kg: f64,
    target_minutes: f64,
}

impl BiometricSimulator {
    /// `training` is expected to have passed [`AppConfig::validate`]; with
    /// inverted bounds the upper bound wins.
    ///
    /// [`AppConfig::validate`]: crate::storage::AppConfig::validate
    pub fn new(
        training: &TrainingConfig,
        profile: WorkoutProfile,
        user: &UserProfile,
        target_minutes: f64,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed.or(training.seed) {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            profile,
            rng,
            resting_hr: training.resting_heart_rate,
            max_hr: user.max_heart_rate(),
            hr_min: training.heart_rate_min,
            hr_max: training.heart_rate_max,
            hr_jitter: i64::from(training.heart_rate_jitter_bpm),
            temp_base: training.temperature_base,
            temp_min: training.temperature_min,
            temp_max: training.temperature_max,
            temp_jitter: training.temperature_jitter,
            age: user.age(),
            weight_kg: user.weight_kg(),
            target_minutes: target_minutes.max(0.0),
        }
    }

    pub fn profile(&self) -> &WorkoutProfile {
        &self.profile
    }

    /// Fraction of the target duration covered by `elapsed_seconds`.
    /// A zero target keeps the simulator on the first profile point.
    pub fn elapsed_fraction(&self, elapsed_seconds: f64) -> f64 {
        if self.target_minutes <= 0.0 {
            return 0.0;
        }
        (elapsed_seconds / 60.0 / self.target_minutes).clamp(0.0, 1.0)
    }

    /// Simulated heart rate in bpm, clamped to the configured bounds.
    pub fn heart_rate(&mut self, elapsed_fraction: f64) -> u32 {
        let target = self
            .profile
            .intensity_at(elapsed_fraction)
            .heart_rate(self.resting_hr, self.max_hr);
        let jitter = if self.hr_jitter > 0 {
            self.rng.gen_range(-self.hr_jitter..=self.hr_jitter)
        } else {
            0
        };
        let bpm = (target.round() + jitter as f64).max(self.hr_min).min(self.hr_max);
        bpm.max(0.0) as u32
    }

    /// Simulated body temperature in °C, rounded to one decimal.
    pub fn body_temperature(&mut self, heart_rate: u32, elapsed_minutes: f64) -> f64 {
        let hr = f64::from(heart_rate);
        let hr_factor = ((hr - TEMPERATURE_HR_BASELINE) / 120.0).max(0.0);
        let time_factor = (elapsed_minutes.max(0.0) / 15.0).min(1.0);
        let intensity_factor = if hr < 100.0 {
            0.3
        } else if hr < 150.0 {
            0.5
        } else {
            0.8
        };

        let age_adjustment = if self.age > 50 {
            -0.2
        } else if self.age < 25 {
            0.1
        } else {
            0.0
        };
        let weight_adjustment = if self.weight_kg > 90.0 {
            0.2
        } else if self.weight_kg < 60.0 {
            -0.1
        } else {
            0.0
        };

        let increase = hr_factor * 3.0 * (0.7 + 0.3 * time_factor) * intensity_factor;
        let jitter = if self.temp_jitter > 0.0 {
            self.rng.gen_range(-self.temp_jitter..=self.temp_jitter)
        } else {
            0.0
        };
        let temp = (self.temp_base + increase + age_adjustment + weight_adjustment + jitter)
            .max(self.temp_min)
            .min(self.temp_max);
        (temp * 10.0).round() / 10.0
    }

    /// One full reading at `elapsed_seconds` of active time.
    pub fn sample(&mut self, elapsed_seconds: f64) -> ExerciseReading {
        let elapsed_minutes = elapsed_seconds.max(0.0) / 60.0;
        let heart_rate_bpm = self.heart_rate(self.elapsed_fraction(elapsed_seconds));
        let body_temperature_c = self.body_temperature(heart_rate_bpm, elapsed_minutes);
        let reading = ExerciseReading {
            duration_minutes: elapsed_minutes,
            heart_rate_bpm,
            body_temperature_c,
        };
        tracing::debug!(
            elapsed_seconds,
            heart_rate_bpm,
            body_temperature_c,
            "simulated reading"
        );
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ProfileInput, Sex};
    use crate::storage::InputRanges;
    use crate::workout::WorkoutCatalog;

    fn user(age: u32, weight_kg: f64) -> UserProfile {
        ProfileInput {
            name: "Test".into(),
            surname: String::new(),
            sex: Sex::Male,
            age,
            height_cm: 175.0,
            weight_kg,
        }
        .validate(&InputRanges::default())
        .unwrap()
    }

    fn simulator(key: &str, seed: u64) -> BiometricSimulator {
        let profile = WorkoutCatalog::default().get(key).unwrap().clone();
        BiometricSimulator::new(&TrainingConfig::default(), profile, &user(30, 75.0), 30.0, Some(seed))
    }

    #[test]
    fn same_seed_same_readings() {
        let mut a = simulator("hiit", 7);
        let mut b = simulator("hiit", 7);
        for step in 0..20 {
            assert_eq!(a.sample(step as f64 * 30.0), b.sample(step as f64 * 30.0));
        }
    }

    #[test]
    fn heart_rate_stays_near_profile_target() {
        let mut sim = simulator("constant", 1);
        // 70 + (190 - 70) * 0.65 = 148
        for _ in 0..50 {
            let hr = sim.heart_rate(0.5);
            assert!((145..=151).contains(&hr), "hr {hr}");
        }
    }

    #[test]
    fn zero_jitter_is_exact() {
        let mut training = TrainingConfig::default();
        training.heart_rate_jitter_bpm = 0;
        training.temperature_jitter = 0.0;
        let profile = WorkoutCatalog::default().get("constant").unwrap().clone();
        let mut sim = BiometricSimulator::new(&training, profile, &user(30, 75.0), 30.0, Some(3));
        assert_eq!(sim.heart_rate(0.0), 148);
        // 36.5 + (148-60)/120 * 3 * 1.0 * 0.5 = 37.6
        assert_eq!(sim.body_temperature(148, 20.0), 37.6);
    }

    #[test]
    fn temperature_rises_with_heart_rate_and_time() {
        let mut training = TrainingConfig::default();
        training.temperature_jitter = 0.0;
        let profile = WorkoutCatalog::default().get("jog").unwrap().clone();
        let mut sim = BiometricSimulator::new(&training, profile, &user(30, 75.0), 30.0, Some(3));
        let cool = sim.body_temperature(90, 1.0);
        let warm = sim.body_temperature(160, 1.0);
        let later = sim.body_temperature(160, 15.0);
        assert!(cool < warm);
        assert!(warm <= later);
    }

    #[test]
    fn zero_target_stays_on_first_point() {
        let profile = WorkoutCatalog::default().get("run").unwrap().clone();
        let sim = BiometricSimulator::new(&TrainingConfig::default(), profile, &user(30, 75.0), 0.0, Some(1));
        assert_eq!(sim.elapsed_fraction(600.0), 0.0);
    }
}
