use std::path::Path;

use clap::Subcommand;

use super::{load_config, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ProfilesAction {
    /// List built-in and configured profiles
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print one profile as JSON
    Show {
        /// Profile key (e.g. "hiit")
        key: String,
    },
}

pub fn run(action: ProfilesAction, config_path: Option<&Path>) -> CmdResult {
    let config = load_config(config_path)?;
    let catalog = config.catalog();
    match action {
        ProfilesAction::List { json: true } => print_json(&catalog.list())?,
        ProfilesAction::List { json: false } => {
            for p in catalog.list() {
                let difficulty = serde_json::to_value(p.difficulty)?;
                println!(
                    "{:<10} {:<20} {:<13} MET {:>4.1}  ~{} kcal/30min",
                    p.key,
                    p.name,
                    difficulty.as_str().unwrap_or_default(),
                    p.met,
                    p.avg_calories_30min
                );
            }
        }
        ProfilesAction::Show { key } => match catalog.get(&key) {
            Some(profile) => print_json(profile)?,
            None => return Err(format!("unknown workout profile '{key}'").into()),
        },
    }
    Ok(())
}
