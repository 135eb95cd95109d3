//! # caloriecoach core library
//!
//! Calorie estimation and live training sessions. The CLI is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Estimator**: a loaded regression model or closed-form formulas,
//!   selected per call, never failing outward
//! - **Timer**: a clock-based state machine accumulating active time across
//!   pauses
//! - **Biometrics**: seeded heart-rate and body-temperature simulation
//!   following a workout intensity profile
//! - **Session**: composes the above on a fixed cadence; driven by the
//!   caller through `tick()`
//! - **Coach**: chat-completion API with localized template fallback
//! - **Speech**: bounded, non-blocking hand-off to a speech backend
//! - **Storage**: TOML configuration loaded once and shared immutably
//!
//! ## Key Components
//!
//! - [`CalorieEstimator`]: model-or-formula estimation
//! - [`TrainingSession`]: live session state machine
//! - [`Coach`]: motivational messages
//! - [`AppConfig`]: application configuration

pub mod biometrics;
pub mod coach;
pub mod error;
pub mod estimator;
pub mod events;
pub mod profile;
pub mod report;
pub mod session;
pub mod speech;
pub mod storage;
pub mod timer;
pub mod workout;

pub use biometrics::BiometricSimulator;
pub use coach::{Coach, CoachContext, Locale, MessageType};
pub use error::{
    ConfigError, CoreError, ExternalServiceError, InvalidStateError, ModelError, ValidationError,
};
pub use estimator::{CalorieEstimate, CalorieEstimator, CalorieMethod, CalorieModel, LinearModel};
pub use events::Event;
pub use profile::{ExerciseReading, ProfileInput, Sex, UserProfile};
pub use session::{
    ReadingInput, SessionExport, SessionOptions, SessionSummary, TrainingSession,
    TrainingSessionState,
};
pub use speech::{SpeechBackend, SpeechQueue, TracingSpeechBackend, VoiceGender};
pub use storage::AppConfig;
pub use timer::{Clock, ManualClock, SystemClock, Timer, TimerState};
pub use workout::{WorkoutCatalog, WorkoutProfile};
