use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "caloriecoach", version, about = "Calorie estimation and training coach")]
struct Cli {
    /// Config file to use instead of ~/.config/caloriecoach/config.toml
    #[arg(long, global = true, env = "CALORIECOACH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate calories for one set of measurements
    Estimate(commands::estimate::EstimateArgs),
    /// Workout intensity profiles
    Profiles {
        #[command(subcommand)]
        action: commands::profiles::ProfilesAction,
    },
    /// Training sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Coach messages
    Coach {
        #[command(subcommand)]
        action: commands::coach::CoachAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Estimate(args) => commands::estimate::run(args, config_path),
        Commands::Profiles { action } => commands::profiles::run(action, config_path),
        Commands::Session { action } => commands::session::run(action, config_path),
        Commands::Coach { action } => commands::coach::run(action, config_path),
        Commands::Config { action } => commands::config::run(action, config_path),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "caloriecoach",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
