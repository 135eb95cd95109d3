use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coach::MessageType;
use crate::estimator::CalorieEstimate;
use crate::profile::ExerciseReading;
use crate::session::SessionSummary;

/// Every state change of a training session produces an Event.
/// Callers collect them from `tick()` and the lifecycle commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        profile_key: String,
        target_minutes: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_seconds: f64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        elapsed_seconds: f64,
        at: DateTime<Utc>,
    },
    /// A reading was taken and estimated; appended to the history.
    SampleRecorded {
        sample: usize,
        elapsed_seconds: f64,
        reading: ExerciseReading,
        estimate: CalorieEstimate,
        at: DateTime<Utc>,
    },
    CoachMessage {
        kind: MessageType,
        text: String,
        elapsed_seconds: f64,
        /// Whether the text was handed to the speech queue.
        queued_for_speech: bool,
        at: DateTime<Utc>,
    },
    SessionStopped {
        summary: SessionSummary,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::SessionStarted { at, .. }
            | Event::SessionPaused { at, .. }
            | Event::SessionResumed { at, .. }
            | Event::SampleRecorded { at, .. }
            | Event::CoachMessage { at, .. }
            | Event::SessionStopped { at, .. } => *at,
        }
    }
}
