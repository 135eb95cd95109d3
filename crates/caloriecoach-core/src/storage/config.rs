//! TOML-based application configuration.
//!
//! Holds everything that is read once at process start:
//! - Input validation ranges
//! - Live training cadence and simulator bounds
//! - Coach API settings and language
//! - Speech output preferences
//! - Optional model artifact path
//! - Food-equivalent calorie table
//! - Custom workout profiles
//!
//! Configuration is stored at `~/.config/caloriecoach/config.toml`. Once
//! loaded it is treated as immutable and shared as `Arc<AppConfig>`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::coach::Locale;
use crate::error::{ConfigError, ValidationError};
use crate::estimator::{default_foods, FoodItem};
use crate::speech::VoiceGender;
use crate::workout::{WorkoutCatalog, WorkoutProfile};

/// Inclusive numeric range used for input validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    pub fn check(&self, field: &str, value: f64) -> Result<(), ValidationError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Validation ranges for user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRanges {
    #[serde(default = "default_age_range")]
    pub age: Range,
    #[serde(default = "default_weight_range")]
    pub weight_kg: Range,
    #[serde(default = "default_height_range")]
    pub height_cm: Range,
    #[serde(default = "default_duration_range")]
    pub duration_min: Range,
    #[serde(default = "default_heart_rate_range")]
    pub heart_rate: Range,
    #[serde(default = "default_body_temp_range")]
    pub body_temp: Range,
}

/// Live training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Active seconds between calorie predictions.
    #[serde(default = "default_sample_interval")]
    pub sample_interval_secs: u64,
    /// A coach message is generated every N predictions.
    #[serde(default = "default_one")]
    pub coach_every_samples: u32,
    #[serde(default = "default_profile_key")]
    pub default_profile: String,
    #[serde(default = "default_target_minutes")]
    pub default_target_minutes: u32,
    #[serde(default = "default_resting_hr")]
    pub resting_heart_rate: f64,
    #[serde(default = "default_hr_min")]
    pub heart_rate_min: f64,
    #[serde(default = "default_hr_max")]
    pub heart_rate_max: f64,
    #[serde(default = "default_hr_jitter")]
    pub heart_rate_jitter_bpm: u32,
    #[serde(default = "default_temp_base")]
    pub temperature_base: f64,
    #[serde(default = "default_temp_min")]
    pub temperature_min: f64,
    #[serde(default = "default_temp_max")]
    pub temperature_max: f64,
    #[serde(default = "default_temp_jitter")]
    pub temperature_jitter: f64,
    /// Fixed simulator seed (None = entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Coach configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default)]
    pub language: Locale,
    /// Environment variable holding the API key. No key = template fallback.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_coach_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_coach_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Speech output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub voice: VoiceGender,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

/// Predictive model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// JSON model artifact. Absent = formula only.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub prefer_model: bool,
    /// MET used by the formula when no workout profile applies.
    #[serde(default = "default_met")]
    pub met_default: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/caloriecoach/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub inputs: InputRanges,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub coach: CoachConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default = "default_foods")]
    pub foods: Vec<FoodItem>,
    /// Extra workout profiles (replace built-ins with the same key).
    #[serde(default)]
    pub profiles: Vec<WorkoutProfile>,
}

// Default functions
fn default_age_range() -> Range {
    Range::new(10.0, 100.0)
}
fn default_weight_range() -> Range {
    Range::new(30.0, 300.0)
}
fn default_height_range() -> Range {
    Range::new(100.0, 250.0)
}
fn default_duration_range() -> Range {
    Range::new(1.0, 300.0)
}
fn default_heart_rate_range() -> Range {
    Range::new(60.0, 220.0)
}
fn default_body_temp_range() -> Range {
    Range::new(35.0, 42.0)
}
fn default_sample_interval() -> u64 {
    30
}
fn default_one() -> u32 {
    1
}
fn default_profile_key() -> String {
    "jog".into()
}
fn default_target_minutes() -> u32 {
    30
}
fn default_resting_hr() -> f64 {
    70.0
}
fn default_hr_min() -> f64 {
    60.0
}
fn default_hr_max() -> f64 {
    220.0
}
fn default_hr_jitter() -> u32 {
    3
}
fn default_temp_base() -> f64 {
    36.5
}
fn default_temp_min() -> f64 {
    36.0
}
fn default_temp_max() -> f64 {
    40.0
}
fn default_temp_jitter() -> f64 {
    0.08
}
fn default_api_key_env() -> String {
    "OPEN_ROUTER_API_KEY".into()
}
fn default_base_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".into()
}
fn default_coach_model() -> String {
    "mistralai/mistral-7b-instruct".into()
}
fn default_max_tokens() -> u32 {
    50
}
fn default_coach_temperature() -> f64 {
    0.7
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_queue_capacity() -> usize {
    4
}
fn default_true() -> bool {
    true
}
fn default_met() -> f64 {
    8.0
}

impl Default for InputRanges {
    fn default() -> Self {
        Self {
            age: default_age_range(),
            weight_kg: default_weight_range(),
            height_cm: default_height_range(),
            duration_min: default_duration_range(),
            heart_rate: default_heart_rate_range(),
            body_temp: default_body_temp_range(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: default_sample_interval(),
            coach_every_samples: 1,
            default_profile: default_profile_key(),
            default_target_minutes: default_target_minutes(),
            resting_heart_rate: default_resting_hr(),
            heart_rate_min: default_hr_min(),
            heart_rate_max: default_hr_max(),
            heart_rate_jitter_bpm: default_hr_jitter(),
            temperature_base: default_temp_base(),
            temperature_min: default_temp_min(),
            temperature_max: default_temp_max(),
            temperature_jitter: default_temp_jitter(),
            seed: None,
        }
    }
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            language: Locale::default(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            model: default_coach_model(),
            max_tokens: default_max_tokens(),
            temperature: default_coach_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            voice: VoiceGender::default(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: None,
            prefer_model: true,
            met_default: default_met(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inputs: InputRanges::default(),
            training: TrainingConfig::default(),
            coach: CoachConfig::default(),
            speech: SpeechConfig::default(),
            model: ModelConfig::default(),
            foods: default_foods(),
            profiles: Vec::new(),
        }
    }
}

impl AppConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".into(),
        };
        let bad = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| bad(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| bad(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(bad(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| bad(e.to_string()))?
                    }
                    // Unset optional: accept JSON literals, fall back to a string
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }
            current = current.get_mut(part).ok_or_else(unknown)?;
        }
        Err(unknown())
    }

    /// Default location: `<data_dir>/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/caloriecoach"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// validated, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: AppConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The result is validated
    /// but not saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: AppConfig =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let ranges = [
            ("inputs.age", self.inputs.age),
            ("inputs.weight_kg", self.inputs.weight_kg),
            ("inputs.height_cm", self.inputs.height_cm),
            ("inputs.duration_min", self.inputs.duration_min),
            ("inputs.heart_rate", self.inputs.heart_rate),
            ("inputs.body_temp", self.inputs.body_temp),
        ];
        for (key, range) in ranges {
            if !(range.min.is_finite() && range.max.is_finite() && range.min <= range.max) {
                return Err(invalid(key, format!("min {} exceeds max {}", range.min, range.max)));
            }
        }

        let t = &self.training;
        if t.sample_interval_secs == 0 {
            return Err(invalid("training.sample_interval_secs", "must be positive".into()));
        }
        if t.coach_every_samples == 0 {
            return Err(invalid("training.coach_every_samples", "must be positive".into()));
        }
        if !(t.heart_rate_min >= 0.0 && t.heart_rate_min <= t.heart_rate_max) {
            return Err(invalid(
                "training.heart_rate_min",
                "must be non-negative and not above heart_rate_max".into(),
            ));
        }
        if !(36.0..=40.0).contains(&t.temperature_min)
            || !(36.0..=40.0).contains(&t.temperature_max)
            || t.temperature_min > t.temperature_max
        {
            return Err(invalid(
                "training.temperature_min",
                "temperature bounds must lie within 36.0..=40.0".into(),
            ));
        }
        if !(t.temperature_jitter >= 0.0 && t.temperature_jitter < 1.0) {
            return Err(invalid("training.temperature_jitter", "must be in 0.0..1.0".into()));
        }

        if self.coach.timeout_secs == 0 {
            return Err(invalid("coach.timeout_secs", "must be positive".into()));
        }
        url::Url::parse(&self.coach.base_url)
            .map_err(|e| invalid("coach.base_url", e.to_string()))?;

        if self.speech.queue_capacity == 0 {
            return Err(invalid("speech.queue_capacity", "must be positive".into()));
        }
        if !(self.model.met_default > 0.0) {
            return Err(invalid("model.met_default", "must be positive".into()));
        }

        for food in &self.foods {
            if !(food.kcal > 0.0) {
                return Err(invalid("foods", format!("'{}' needs positive kcal", food.name)));
            }
        }
        for profile in &self.profiles {
            profile
                .validate()
                .map_err(|e| invalid("profiles", e.to_string()))?;
        }

        let catalog = self.catalog();
        if catalog.get(&t.default_profile).is_none() {
            return Err(invalid(
                "training.default_profile",
                format!("unknown profile '{}'", t.default_profile),
            ));
        }
        Ok(())
    }

    /// Built-in workout profiles merged with the configured ones.
    pub fn catalog(&self) -> WorkoutCatalog {
        WorkoutCatalog::with_custom(&self.profiles)
    }

    /// Coach API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.coach.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = AppConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        parsed.validate().unwrap();
    }

    #[test]
    fn empty_file_gives_defaults() {
        let parsed: AppConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.training.sample_interval_secs, 30);
        assert_eq!(parsed.inputs.heart_rate, Range::new(60.0, 220.0));
        assert!(!parsed.foods.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let parsed: AppConfig = toml::from_str(
            "[training]\nsample_interval_secs = 10\n\n[coach]\nlanguage = \"fr\"\n",
        )
        .unwrap();
        assert_eq!(parsed.training.sample_interval_secs, 10);
        assert_eq!(parsed.training.coach_every_samples, 1);
        assert_eq!(parsed.coach.language, Locale::Fr);
        assert_eq!(parsed.coach.timeout_secs, 10);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("training.sample_interval_secs").as_deref(), Some("30"));
        assert_eq!(cfg.get("coach.api_key_env").as_deref(), Some("OPEN_ROUTER_API_KEY"));
        assert!(cfg.get("training.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = AppConfig::default();
        cfg.set("training.sample_interval_secs", "15").unwrap();
        cfg.set("coach.language", "en").unwrap();
        cfg.set("speech.enabled", "true").unwrap();
        cfg.set("training.seed", "42").unwrap();
        assert_eq!(cfg.training.sample_interval_secs, 15);
        assert_eq!(cfg.coach.language, Locale::En);
        assert!(cfg.speech.enabled);
        assert_eq!(cfg.training.seed, Some(42));
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut cfg = AppConfig::default();
        assert!(cfg.set("training.nonexistent", "1").is_err());
        assert!(cfg.set("speech.enabled", "maybe").is_err());
        assert!(cfg.set("coach.language", "de").is_err());
        assert!(cfg.set("training.sample_interval_secs", "0").is_err());
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let mut cfg = AppConfig::default();
        cfg.inputs.age = Range::new(90.0, 10.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "inputs.age"
        ));
    }

    #[test]
    fn validate_rejects_unknown_default_profile() {
        let mut cfg = AppConfig::default();
        cfg.training.default_profile = "rowing".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_temperature_outside_plausible_bounds() {
        let mut cfg = AppConfig::default();
        cfg.training.temperature_max = 41.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn range_check_reports_bounds() {
        let err = Range::new(1.0, 2.0).check("x", 3.0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "x".into(),
                value: 3.0,
                min: 1.0,
                max: 2.0
            }
        );
        assert!(!Range::new(1.0, 2.0).contains(f64::NAN));
    }
}
