use std::path::Path;

use caloriecoach_core::AppConfig;
use clap::Subcommand;

use super::{load_config, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,
    /// Print the config file location
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Get a config value
    Get {
        /// Dotted key (e.g. "coach.language", "training.sample_interval_secs")
        key: String,
    },
    /// Set a config value and save
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: ConfigAction, config_path: Option<&Path>) -> CmdResult {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::path()?,
    };
    match action {
        ConfigAction::Show => print_json(&load_config(config_path)?)?,
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(format!("{} already exists (use --force)", path.display()).into());
            }
            AppConfig::default().save_to(&path)?;
            println!("wrote {}", path.display());
        }
        ConfigAction::Get { key } => {
            let config = load_config(config_path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(config_path)?;
            config.set(&key, &value)?;
            config.save_to(&path)?;
            println!("ok");
        }
    }
    Ok(())
}
