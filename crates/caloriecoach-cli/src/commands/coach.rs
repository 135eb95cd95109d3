use std::path::Path;

use caloriecoach_core::{Coach, CoachContext, Locale, MessageType};
use clap::Subcommand;

use super::{load_config, CmdResult};

#[derive(Subcommand)]
pub enum CoachAction {
    /// Print one coach message
    Say {
        /// motivation | progress | nutrition | wellness | encouragement | food-comparison
        kind: MessageType,
        #[arg(long, default_value = "")]
        name: String,
        /// Calories burned so far
        #[arg(long, default_value = "0")]
        calories: f64,
        /// Calorie target for the session
        #[arg(long, default_value = "300")]
        target: f64,
        /// Minutes trained so far
        #[arg(long, default_value = "0")]
        minutes: f64,
        /// Share of the target duration completed (0-100)
        #[arg(long, default_value = "0")]
        completion: f64,
        /// es | en | fr (defaults to config)
        #[arg(long)]
        language: Option<Locale>,
        /// Use templates only, even with an API key
        #[arg(long)]
        offline: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run(action: CoachAction, config_path: Option<&Path>) -> CmdResult {
    match action {
        CoachAction::Say {
            kind,
            name,
            calories,
            target,
            minutes,
            completion,
            language,
            offline,
            seed,
        } => {
            let mut config = load_config(config_path)?;
            if let Some(language) = language {
                config.coach.language = language;
            }
            let mut coach = if offline {
                Coach::offline(config.coach.language, config.foods.clone(), seed)
            } else {
                Coach::from_config(&config, seed)
            };
            let ctx = CoachContext {
                user_name: name,
                calories_burned: calories,
                target_calories: target,
                elapsed_minutes: minutes,
                completion_percent: completion.clamp(0.0, 100.0),
                duration_complete: completion >= 100.0,
            };
            println!("{}", coach.generate(kind, &ctx));
        }
    }
    Ok(())
}
