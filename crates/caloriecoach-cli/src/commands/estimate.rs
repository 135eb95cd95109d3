use std::path::Path;

use caloriecoach_core::estimator::{top_food_equivalents, FoodEquivalent};
use caloriecoach_core::report::render_estimate;
use caloriecoach_core::{CalorieEstimate, CalorieEstimator, ExerciseReading};
use clap::Args;
use serde::Serialize;

use super::{load_config, print_json, CmdResult, UserArgs};

#[derive(Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    user: UserArgs,
    /// Exercise duration in minutes
    #[arg(long)]
    duration: f64,
    /// Average heart rate in bpm
    #[arg(long)]
    heart_rate: u32,
    /// Body temperature in °C
    #[arg(long)]
    temperature: f64,
    /// Workout profile whose MET the formula uses
    #[arg(long)]
    profile: Option<String>,
    /// Skip the predictive model even when one is configured
    #[arg(long)]
    formula: bool,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct EstimateOutput<'a> {
    reading: &'a ExerciseReading,
    #[serde(flatten)]
    estimate: &'a CalorieEstimate,
    food_equivalents: Vec<FoodEquivalent>,
}

pub fn run(args: EstimateArgs, config_path: Option<&Path>) -> CmdResult {
    let config = load_config(config_path)?;
    let user = args.user.validate(&config)?;
    let reading =
        ExerciseReading::validated(args.duration, args.heart_rate, args.temperature, &config.inputs)?;
    let met = match &args.profile {
        Some(key) => {
            let catalog = config.catalog();
            let profile = catalog
                .get(key)
                .ok_or_else(|| format!("unknown workout profile '{key}'"))?;
            Some(profile.met)
        }
        None => None,
    };

    let estimator = CalorieEstimator::from_config(&config.model);
    let prefer_model = config.model.prefer_model && !args.formula;
    let estimate = estimator.estimate_with_met(&user, &reading, prefer_model, met);

    if args.json {
        print_json(&EstimateOutput {
            reading: &reading,
            estimate: &estimate,
            food_equivalents: top_food_equivalents(estimate.value_kcal, &config.foods, 3),
        })
    } else {
        print!("{}", render_estimate(&user, &reading, &estimate, &config.foods));
        Ok(())
    }
}
