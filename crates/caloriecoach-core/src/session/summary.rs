//! Session history, summary and export records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coach::MessageType;
use crate::estimator::{CalorieEstimate, CalorieMethod};
use crate::profile::ExerciseReading;
use crate::timer::TimerState;

/// One sample of the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sample: usize,
    pub elapsed_seconds: f64,
    pub timestamp: DateTime<Utc>,
    pub reading: ExerciseReading,
    pub estimate: CalorieEstimate,
    /// Planned workout intensity at this point, 0.0 .. 1.0
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachLogEntry {
    pub elapsed_seconds: f64,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageType,
    pub text: String,
}

/// Owned view of a session at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSessionState {
    pub session_id: Uuid,
    pub status: TimerState,
    pub elapsed_seconds: f64,
    pub formatted_time: String,
    pub progress_percent: f64,
    pub target_minutes: u32,
    pub calories_burned: f64,
    pub target_calories: f64,
    pub last_reading: Option<ExerciseReading>,
    pub last_estimate: Option<CalorieEstimate>,
    pub last_coach_message: Option<CoachLogEntry>,
    pub history: Vec<HistoryEntry>,
}

/// Heart-rate and temperature statistics over a set of readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingStats {
    pub avg_heart_rate: Option<f64>,
    pub min_heart_rate: Option<u32>,
    pub max_heart_rate: Option<u32>,
    pub avg_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
}

impl ReadingStats {
    pub fn from_readings<'a>(readings: impl IntoIterator<Item = &'a ExerciseReading>) -> Self {
        let readings: Vec<&ExerciseReading> = readings.into_iter().collect();
        if readings.is_empty() {
            return Self::default();
        }
        let n = readings.len() as f64;
        let hr_sum: f64 = readings.iter().map(|r| f64::from(r.heart_rate_bpm)).sum();
        let temp_sum: f64 = readings.iter().map(|r| r.body_temperature_c).sum();
        Self {
            avg_heart_rate: Some(round1(hr_sum / n)),
            min_heart_rate: readings.iter().map(|r| r.heart_rate_bpm).min(),
            max_heart_rate: readings.iter().map(|r| r.heart_rate_bpm).max(),
            avg_temperature: Some(round1(temp_sum / n)),
            max_temperature: readings
                .iter()
                .map(|r| r.body_temperature_c)
                .max_by(f64::total_cmp),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub user_name: String,
    pub profile_key: String,
    pub profile_name: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub duration_formatted: String,
    pub target_minutes: u32,
    pub completion_percent: f64,
    pub total_calories: f64,
    pub target_calories: f64,
    pub goal_achieved: bool,
    pub method: CalorieMethod,
    #[serde(flatten)]
    pub stats: ReadingStats,
    pub sample_count: usize,
    pub coach_message_count: usize,
}

/// Everything needed to analyse a finished session offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub summary: Option<SessionSummary>,
    pub history: Vec<HistoryEntry>,
    pub coach_log: Vec<CoachLogEntry>,
}

impl SessionExport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
