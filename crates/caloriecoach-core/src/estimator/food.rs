//! Food equivalents and calorie targets.

use serde::{Deserialize, Serialize};

/// Reference burn rate for a 70 kg person, kcal per minute.
const REFERENCE_KCAL_PER_MIN: f64 = 10.0;
const REFERENCE_WEIGHT_KG: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    /// Calories per unit.
    pub kcal: f64,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, kcal: f64) -> Self {
        Self {
            name: name.into(),
            kcal,
        }
    }
}

pub fn default_foods() -> Vec<FoodItem> {
    vec![
        FoodItem::new("apple", 52.0),
        FoodItem::new("cookie", 50.0),
        FoodItem::new("soda", 140.0),
        FoodItem::new("chocolate bar", 235.0),
        FoodItem::new("burger", 250.0),
        FoodItem::new("pizza slice", 285.0),
        FoodItem::new("large fries", 510.0),
        FoodItem::new("big burger", 563.0),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodEquivalent {
    pub name: String,
    pub kcal_per_unit: f64,
    pub count: u64,
}

/// How many units of each food `kcal` amounts to, in table order.
pub fn food_equivalents(kcal: f64, foods: &[FoodItem]) -> Vec<FoodEquivalent> {
    foods
        .iter()
        .filter(|f| f.kcal > 0.0)
        .map(|f| FoodEquivalent {
            name: f.name.clone(),
            kcal_per_unit: f.kcal,
            count: (kcal.max(0.0) / f.kcal).round() as u64,
        })
        .collect()
}

/// The `n` largest equivalents. Ties keep table order.
pub fn top_food_equivalents(kcal: f64, foods: &[FoodItem], n: usize) -> Vec<FoodEquivalent> {
    let mut all = food_equivalents(kcal, foods);
    all.sort_by(|a, b| b.count.cmp(&a.count));
    all.truncate(n);
    all
}

/// Food whose unit calories are nearest to `kcal`.
pub fn closest_food(kcal: f64, foods: &[FoodItem]) -> Option<&FoodItem> {
    foods
        .iter()
        .filter(|f| f.kcal > 0.0)
        .min_by(|a, b| (a.kcal - kcal).abs().total_cmp(&(b.kcal - kcal).abs()))
}

/// Calorie goal for a session: 10 kcal/min scaled by body weight.
pub fn target_calories(weight_kg: f64, target_minutes: f64) -> f64 {
    REFERENCE_KCAL_PER_MIN * (weight_kg / REFERENCE_WEIGHT_KG) * target_minutes.max(0.0)
}
