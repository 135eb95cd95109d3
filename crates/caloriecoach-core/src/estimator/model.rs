//! Pretrained model seam.
//!
//! The model itself is trained elsewhere. This crate only needs to feed it a
//! feature vector in a fixed order and read back one number.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::profile::{ExerciseReading, UserProfile};
use crate::storage::ModelConfig;

pub const FEATURE_COUNT: usize = 7;

/// Feature names in model order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "sex_male",
    "age",
    "height_cm",
    "weight_kg",
    "duration_min",
    "heart_rate",
    "body_temp",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(profile: &UserProfile, reading: &ExerciseReading) -> Self {
        Self([
            profile.sex().encoded(),
            f64::from(profile.age()),
            profile.height_cm(),
            profile.weight_kg(),
            reading.duration_minutes,
            f64::from(reading.heart_rate_bpm),
            reading.body_temperature_c,
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

/// A loaded regression model.
pub trait CalorieModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Raw prediction in kcal. Callers handle flooring and fallback.
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}

/// `intercept + Σ coefficient·feature`, stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub name: String,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: LinearModel =
            serde_json::from_str(json).map_err(|e| ModelError::InvalidFeatures(e.to_string()))?;
        if model.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::InvalidFeatures(format!(
                "expected {FEATURE_COUNT} coefficients, found {}",
                model.coefficients.len()
            )));
        }
        Ok(model)
    }

    /// Read a model artifact. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>, ModelError> {
        if !path.exists() {
            return Ok(None);
        }
        let load_failed = |message: String| ModelError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let json = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        Self::from_json(&json)
            .map(Some)
            .map_err(|e| load_failed(e.to_string()))
    }
}

impl CalorieModel for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::InvalidFeatures(format!(
                "model has {} coefficients",
                self.coefficients.len()
            )));
        }
        let value = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.as_slice())
                .map(|(c, x)| c * x)
                .sum::<f64>();
        Ok(value)
    }
}

/// Model configured in `[model]`, if any.
pub fn load_configured(config: &ModelConfig) -> Result<Option<Arc<dyn CalorieModel>>, ModelError> {
    let Some(path) = &config.path else {
        return Ok(None);
    };
    let model = LinearModel::load(path)?;
    if model.is_none() {
        tracing::info!(path = %path.display(), "model artifact not found, using formulas");
    }
    Ok(model.map(|m| Arc::new(m) as Arc<dyn CalorieModel>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MODEL_JSON: &str = r#"{
        "name": "linear-test",
        "intercept": -10.0,
        "coefficients": [5.0, 0.1, 0.0, 0.5, 6.0, 0.2, 0.0]
    }"#;

    #[test]
    fn parses_and_predicts() {
        let model = LinearModel::from_json(MODEL_JSON).unwrap();
        let features = FeatureVector([1.0, 30.0, 175.0, 75.0, 30.0, 110.0, 37.2]);
        // -10 + 5 + 3 + 37.5 + 180 + 22
        assert!((model.predict(&features).unwrap() - 237.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_wrong_coefficient_count() {
        let err = LinearModel::from_json(r#"{"name":"x","intercept":0,"coefficients":[1,2]}"#)
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidFeatures(_)));
    }

    #[test]
    fn missing_file_is_absence() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LinearModel::load(&dir.path().join("none.json")).unwrap().is_none());
    }

    #[test]
    fn malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            LinearModel::load(file.path()),
            Err(ModelError::LoadFailed { .. })
        ));
    }

    #[test]
    fn unset_path_loads_nothing() {
        assert!(load_configured(&ModelConfig::default()).unwrap().is_none());
    }
}
