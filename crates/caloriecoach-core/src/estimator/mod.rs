//! Calorie estimation.
//!
//! Two strategies are available per call: a loaded [`CalorieModel`] or the
//! closed-form formulas. Estimation never fails outward; any model problem
//! falls back to the formulas and the result reports
//! [`CalorieMethod::Formula`].

pub mod food;
pub mod formula;
mod model;

pub use food::{
    closest_food, default_foods, food_equivalents, target_calories, top_food_equivalents,
    FoodEquivalent, FoodItem,
};
pub use model::{
    load_configured, CalorieModel, FeatureVector, LinearModel, FEATURE_COUNT, FEATURE_NAMES,
};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::profile::{ExerciseReading, UserProfile};
use crate::storage::ModelConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalorieMethod {
    Model,
    Formula,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieEstimate {
    pub value_kcal: f64,
    pub method: CalorieMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl CalorieEstimate {
    fn formula(value_kcal: f64) -> Self {
        Self {
            value_kcal,
            method: CalorieMethod::Formula,
            model_name: None,
        }
    }
}

/// Strategy chosen for one estimate.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'a> {
    Model(&'a dyn CalorieModel),
    Formula,
}

#[derive(Debug, Clone)]
pub struct CalorieEstimator {
    model: Option<Arc<dyn CalorieModel>>,
    met_default: f64,
}

impl Default for CalorieEstimator {
    fn default() -> Self {
        Self::formula_only(ModelConfig::default().met_default)
    }
}

impl CalorieEstimator {
    pub fn formula_only(met_default: f64) -> Self {
        Self {
            model: None,
            met_default,
        }
    }

    pub fn with_model(mut self, model: Arc<dyn CalorieModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Estimator for `[model]`. A broken artifact is logged and ignored.
    pub fn from_config(config: &ModelConfig) -> Self {
        let estimator = Self::formula_only(config.met_default);
        match load_configured(config) {
            Ok(Some(model)) => {
                tracing::info!(model = model.name(), "calorie model loaded");
                estimator.with_model(model)
            }
            Ok(None) => estimator,
            Err(e) => {
                tracing::warn!(error = %e, "calorie model unusable, using formulas");
                estimator
            }
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn met_default(&self) -> f64 {
        self.met_default
    }

    pub fn strategy(&self, prefer_model: bool) -> Strategy<'_> {
        match (&self.model, prefer_model) {
            (Some(model), true) => Strategy::Model(model.as_ref()),
            _ => Strategy::Formula,
        }
    }

    /// Estimate with the default MET.
    pub fn estimate(
        &self,
        profile: &UserProfile,
        reading: &ExerciseReading,
        prefer_model: bool,
    ) -> CalorieEstimate {
        self.estimate_with_met(profile, reading, prefer_model, None)
    }

    /// Estimate using `met` (e.g. the workout profile's) for the MET formula.
    pub fn estimate_with_met(
        &self,
        profile: &UserProfile,
        reading: &ExerciseReading,
        prefer_model: bool,
        met: Option<f64>,
    ) -> CalorieEstimate {
        let met = met.filter(|m| *m > 0.0).unwrap_or(self.met_default);
        if prefer_model {
            match self.predict_model(profile, reading) {
                Ok(estimate) => return estimate,
                Err(ModelError::Unavailable) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "model prediction failed, using formulas");
                }
            }
        }
        tracing::debug!(met, "formula estimate");
        CalorieEstimate::formula(formula::combined_calories(profile, reading, met))
    }

    /// Model-only estimate. Fails with [`ModelError::Unavailable`] when no
    /// model is loaded.
    pub fn predict_model(
        &self,
        profile: &UserProfile,
        reading: &ExerciseReading,
    ) -> Result<CalorieEstimate, ModelError> {
        let Strategy::Model(model) = self.strategy(true) else {
            return Err(ModelError::Unavailable);
        };
        Ok(CalorieEstimate {
            value_kcal: predict(model, profile, reading)?,
            method: CalorieMethod::Model,
            model_name: Some(model.name().to_string()),
        })
    }
}

fn predict(
    model: &dyn CalorieModel,
    profile: &UserProfile,
    reading: &ExerciseReading,
) -> Result<f64, ModelError> {
    let features = FeatureVector::new(profile, reading);
    if !features.is_finite() {
        return Err(ModelError::InvalidFeatures("non-finite feature".into()));
    }
    let value = model.predict(&features)?;
    if !value.is_finite() {
        return Err(ModelError::PredictionFailed(format!("non-finite prediction {value}")));
    }
    Ok(value.max(0.0))
}
