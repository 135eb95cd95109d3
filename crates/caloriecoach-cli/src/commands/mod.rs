pub mod coach;
pub mod config;
pub mod estimate;
pub mod profiles;
pub mod session;

use std::path::Path;

use caloriecoach_core::{AppConfig, ConfigError, ProfileInput, Sex, UserProfile, ValidationError};
use clap::Args;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Config from `path`, or from the default location (created on first use).
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) if path.exists() => AppConfig::load_from(path),
        Some(path) => {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            Ok(AppConfig::default())
        }
        None => AppConfig::load(),
    }
}

/// Profile fields shared by the commands that need a user.
#[derive(Args, Debug, Clone)]
pub struct UserArgs {
    #[arg(long, default_value = "Usuario")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub surname: String,
    /// male | female
    #[arg(long)]
    pub sex: Sex,
    #[arg(long)]
    pub age: u32,
    /// Height in centimetres
    #[arg(long)]
    pub height: f64,
    /// Weight in kilograms
    #[arg(long)]
    pub weight: f64,
}

impl UserArgs {
    pub fn validate(&self, config: &AppConfig) -> Result<UserProfile, ValidationError> {
        ProfileInput {
            name: self.name.clone(),
            surname: self.surname.clone(),
            sex: self.sex,
            age: self.age,
            height_cm: self.height,
            weight_kg: self.weight,
        }
        .validate(&config.inputs)
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
