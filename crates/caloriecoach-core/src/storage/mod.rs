mod config;

pub use config::{
    AppConfig, CoachConfig, InputRanges, ModelConfig, Range, SpeechConfig, TrainingConfig,
};

use std::path::PathBuf;

/// Returns `~/.config/caloriecoach[-dev]/` based on CALORIECOACH_ENV.
///
/// Set CALORIECOACH_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    let env = std::env::var("CALORIECOACH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("caloriecoach-dev")
    } else {
        base_dir.join("caloriecoach")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
