use std::path::{Path, PathBuf};
use std::sync::Arc;

use caloriecoach_core::report::render_session;
use caloriecoach_core::{Coach, Event, ManualClock, SessionOptions, TrainingSession};
use clap::Subcommand;

use super::{load_config, CmdResult, UserArgs};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run an accelerated session on a simulated clock
    Simulate {
        #[command(flatten)]
        user: UserArgs,
        /// Workout profile key
        #[arg(long)]
        profile: Option<String>,
        /// Target duration in minutes
        #[arg(long)]
        minutes: Option<u32>,
        /// Stop after this many minutes instead of the target
        #[arg(long)]
        stop_after: Option<u32>,
        /// Seed for reproducible readings and messages
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the predictive model
        #[arg(long)]
        formula: bool,
        /// Use coach templates only, even with an API key
        #[arg(long)]
        offline: bool,
        /// Print a text report instead of the JSON export
        #[arg(long)]
        text: bool,
        /// Also write the JSON export to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub fn run(action: SessionAction, config_path: Option<&Path>) -> CmdResult {
    match action {
        SessionAction::Simulate {
            user,
            profile,
            minutes,
            stop_after,
            seed,
            formula,
            offline,
            text,
            output,
        } => {
            let config = Arc::new(load_config(config_path)?);
            let user = user.validate(&config)?;
            let clock = ManualClock::new();
            let mut session = TrainingSession::new(
                Arc::clone(&config),
                user,
                SessionOptions {
                    profile_key: profile,
                    target_minutes: minutes,
                    prefer_model: formula.then_some(false),
                    seed,
                },
            )?
            .with_clock(Arc::new(clock.clone()));
            if offline {
                session = session.with_coach(Coach::offline(
                    config.coach.language,
                    config.foods.clone(),
                    seed.map(|s| s.wrapping_add(1)),
                ));
            }

            let total_secs = u64::from(stop_after.unwrap_or(session.target_minutes())) * 60;
            let step = config.training.sample_interval_secs.max(1);

            log_event(&session.start()?);
            let mut elapsed = 0;
            while elapsed < total_secs {
                let advance = step.min(total_secs - elapsed);
                clock.advance_secs(advance);
                elapsed += advance;
                for event in session.tick() {
                    log_event(&event);
                }
            }
            for event in session.stop()? {
                log_event(&event);
            }

            let export = session.export();
            let json = export.to_json()?;
            if let Some(path) = output {
                std::fs::write(&path, &json)?;
                eprintln!("export written to {}", path.display());
            }
            match (&export.summary, text) {
                (Some(summary), true) => print!("{}", render_session(summary, &export.coach_log)),
                _ => println!("{json}"),
            }
            Ok(())
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::CoachMessage { kind, text, .. } => tracing::info!(%kind, %text, "coach"),
        Event::SampleRecorded {
            sample, estimate, ..
        } => tracing::info!(sample, kcal = estimate.value_kcal, "sample"),
        other => tracing::debug!(event = ?other, "session event"),
    }
}
