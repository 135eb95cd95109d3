//! Live training session.
//!
//! A session composes the timer, the biometric simulator, the estimator,
//! the coach and the optional speech queue. It owns no thread; the caller
//! drives it with [`TrainingSession::tick`] and reads [`TrainingSession::snapshot`].
//!
//! ## Cadence
//!
//! On each tick while running, a sample is taken once at least
//! `training.sample_interval_secs` of active time have passed since the
//! previous sample. Every `training.coach_every_samples`-th sample also
//! produces an automatic coach message.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::summary::{
    round1, CoachLogEntry, HistoryEntry, ReadingStats, SessionExport, SessionSummary,
    TrainingSessionState,
};
use crate::biometrics::BiometricSimulator;
use crate::coach::{Coach, CoachContext, MessageType};
use crate::error::{ConfigError, InvalidStateError, ValidationError};
use crate::estimator::{target_calories, CalorieEstimate, CalorieEstimator, CalorieMethod};
use crate::events::Event;
use crate::profile::{ExerciseReading, UserProfile};
use crate::speech::SpeechQueue;
use crate::storage::AppConfig;
use crate::timer::{Clock, SystemClock, Timer, TimerProgress, TimerState};
use crate::workout::WorkoutProfile;

/// Per-session choices. `None` fields fall back to configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub profile_key: Option<String>,
    pub target_minutes: Option<u32>,
    pub prefer_model: Option<bool>,
    pub seed: Option<u64>,
}

/// Where the next sample's values come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadingInput {
    Simulated,
    /// Measured heart rate; temperature is simulated from it.
    HeartRate(u32),
    Manual {
        heart_rate_bpm: u32,
        body_temperature_c: f64,
    },
}

#[derive(Debug)]
pub struct TrainingSession {
    id: Uuid,
    config: Arc<AppConfig>,
    user: UserProfile,
    workout: WorkoutProfile,
    target_minutes: u32,
    target_calories: f64,
    prefer_model: bool,
    clock: Arc<dyn Clock>,
    timer: Timer,
    simulator: BiometricSimulator,
    estimator: CalorieEstimator,
    coach: Coach,
    speech: Option<SpeechQueue>,
    history: Vec<HistoryEntry>,
    coach_log: Vec<CoachLogEntry>,
    last_reading: Option<ExerciseReading>,
    last_estimate: Option<CalorieEstimate>,
    /// Active time at the previous sample.
    last_sample_ms: u64,
    started_at: Option<DateTime<Utc>>,
    clock_at_start_ms: u64,
    summary: Option<SessionSummary>,
}

impl TrainingSession {
    pub fn new(
        config: Arc<AppConfig>,
        user: UserProfile,
        options: SessionOptions,
    ) -> Result<Self, ValidationError> {
        config.validate().map_err(|e| match e {
            ConfigError::InvalidValue { key, message } => ValidationError::InvalidValue {
                field: key,
                message,
            },
            other => ValidationError::InvalidValue {
                field: "config".into(),
                message: other.to_string(),
            },
        })?;
        let training = &config.training;
        let key = options
            .profile_key
            .unwrap_or_else(|| training.default_profile.clone());
        let workout = config
            .catalog()
            .get(&key)
            .cloned()
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "profile".into(),
                message: format!("unknown workout profile '{key}'"),
            })?;

        let target_minutes = options
            .target_minutes
            .unwrap_or(training.default_target_minutes);
        config
            .inputs
            .duration_min
            .check("target_minutes", f64::from(target_minutes))?;

        let seed = options.seed.or(training.seed);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let simulator = BiometricSimulator::new(
            training,
            workout.clone(),
            &user,
            f64::from(target_minutes),
            seed,
        );
        let estimator = CalorieEstimator::from_config(&config.model);
        let coach = Coach::from_config(&config, seed.map(|s| s.wrapping_add(1)));
        let speech = SpeechQueue::from_config(&config.speech, config.coach.language);

        Ok(Self {
            id: Uuid::new_v4(),
            target_calories: target_calories(user.weight_kg(), f64::from(target_minutes)),
            prefer_model: options.prefer_model.unwrap_or(config.model.prefer_model),
            timer: Timer::new(Arc::clone(&clock)),
            clock,
            config,
            user,
            workout,
            target_minutes,
            simulator,
            estimator,
            coach,
            speech,
            history: Vec::new(),
            coach_log: Vec::new(),
            last_reading: None,
            last_estimate: None,
            last_sample_ms: 0,
            started_at: None,
            clock_at_start_ms: 0,
            summary: None,
        })
    }

    /// Replace the time source. Only meaningful before `start()`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.timer = Timer::new(Arc::clone(&clock));
        self.clock = clock;
        self
    }

    pub fn with_estimator(mut self, estimator: CalorieEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_coach(mut self, coach: Coach) -> Self {
        self.coach = coach;
        self
    }

    pub fn with_speech(mut self, speech: Option<SpeechQueue>) -> Self {
        self.speech = speech;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> TimerState {
        self.timer.state()
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn workout(&self) -> &WorkoutProfile {
        &self.workout
    }

    pub fn target_minutes(&self) -> u32 {
        self.target_minutes
    }

    pub fn target_calories(&self) -> f64 {
        self.target_calories
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.timer.elapsed_seconds()
    }

    pub fn progress(&self) -> TimerProgress {
        self.timer.progress(f64::from(self.target_minutes))
    }

    pub fn calories_burned(&self) -> f64 {
        self.last_estimate.as_ref().map_or(0.0, |e| e.value_kcal)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn coach_log(&self) -> &[CoachLogEntry] {
        &self.coach_log
    }

    /// Set once the session has been stopped.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn snapshot(&self) -> TrainingSessionState {
        let progress = self.progress();
        TrainingSessionState {
            session_id: self.id,
            status: self.status(),
            elapsed_seconds: progress.elapsed_seconds,
            formatted_time: progress.formatted_time,
            progress_percent: progress.progress_percent,
            target_minutes: self.target_minutes,
            calories_burned: self.calories_burned(),
            target_calories: self.target_calories,
            last_reading: self.last_reading,
            last_estimate: self.last_estimate.clone(),
            last_coach_message: self.coach_log.last().cloned(),
            history: self.history.clone(),
        }
    }

    pub fn export(&self) -> SessionExport {
        SessionExport {
            summary: self.summary.clone(),
            history: self.history.clone(),
            coach_log: self.coach_log.clone(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<Event, InvalidStateError> {
        self.timer.start()?;
        self.started_at = Some(Utc::now());
        self.clock_at_start_ms = self.clock.now_ms();
        self.last_sample_ms = 0;
        tracing::info!(
            session = %self.id,
            profile = %self.workout.key,
            target_minutes = self.target_minutes,
            "session started"
        );
        Ok(Event::SessionStarted {
            session_id: self.id,
            profile_key: self.workout.key.clone(),
            target_minutes: self.target_minutes,
            at: self.timestamp(),
        })
    }

    pub fn pause(&mut self) -> Result<Event, InvalidStateError> {
        self.timer.pause()?;
        let elapsed_seconds = self.timer.elapsed_seconds();
        tracing::info!(session = %self.id, elapsed_seconds, "session paused");
        Ok(Event::SessionPaused {
            elapsed_seconds,
            at: self.timestamp(),
        })
    }

    pub fn resume(&mut self) -> Result<Event, InvalidStateError> {
        self.timer.resume()?;
        let elapsed_seconds = self.timer.elapsed_seconds();
        tracing::info!(session = %self.id, elapsed_seconds, "session resumed");
        Ok(Event::SessionResumed {
            elapsed_seconds,
            at: self.timestamp(),
        })
    }

    /// Take a simulated sample if one is due. No-op unless running.
    pub fn tick(&mut self) -> Vec<Event> {
        self.advance(None)
    }

    /// Like [`tick`](Self::tick), but with measured values for the sample.
    /// Input is validated even when no sample is due.
    pub fn tick_with(&mut self, input: ReadingInput) -> Result<Vec<Event>, ValidationError> {
        let ranges = &self.config.inputs;
        let measured = match input {
            ReadingInput::Simulated => None,
            ReadingInput::HeartRate(bpm) => {
                ranges.heart_rate.check("heart_rate_bpm", f64::from(bpm))?;
                Some((bpm, None))
            }
            ReadingInput::Manual {
                heart_rate_bpm,
                body_temperature_c,
            } => {
                ranges
                    .heart_rate
                    .check("heart_rate_bpm", f64::from(heart_rate_bpm))?;
                ranges
                    .body_temp
                    .check("body_temperature_c", body_temperature_c)?;
                Some((heart_rate_bpm, Some(body_temperature_c)))
            }
        };
        Ok(self.advance(measured))
    }

    /// On-demand coach message of `kind`, in any state.
    pub fn request_coach_message(&mut self, kind: MessageType) -> Event {
        self.emit_coach(kind)
    }

    /// Stop the session, compute the final estimate and the summary.
    ///
    /// Valid from Idle, Running or Paused. Returns the closing coach message
    /// followed by `SessionStopped`.
    pub fn stop(&mut self) -> Result<Vec<Event>, InvalidStateError> {
        let state = self.timer.state();
        if state == TimerState::Stopped {
            return Err(InvalidStateError {
                operation: "stop",
                state,
            });
        }
        self.timer.stop();

        let elapsed_seconds = self.timer.elapsed_seconds();
        let elapsed_minutes = elapsed_seconds / 60.0;
        let reading = match self.last_reading {
            Some(last) => ExerciseReading {
                duration_minutes: elapsed_minutes,
                ..last
            },
            None => self.simulator.sample(elapsed_seconds),
        };
        let estimate = self.estimate(&reading);
        self.last_reading = Some(reading);
        self.last_estimate = Some(estimate);

        let coach_event = self.emit_coach(MessageType::Encouragement);
        let summary = self.build_summary();
        tracing::info!(
            session = %self.id,
            elapsed_seconds,
            total_calories = summary.total_calories,
            samples = summary.sample_count,
            "session stopped"
        );
        self.summary = Some(summary.clone());

        Ok(vec![
            coach_event,
            Event::SessionStopped {
                summary,
                at: self.timestamp(),
            },
        ])
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, measured: Option<(u32, Option<f64>)>) -> Vec<Event> {
        if !self.timer.is_running() {
            return Vec::new();
        }
        let elapsed_ms = self.timer.elapsed_ms();
        let interval_ms = self
            .config
            .training
            .sample_interval_secs
            .saturating_mul(1000);
        let due_at = self.last_sample_ms.saturating_add(interval_ms);
        if elapsed_ms < due_at {
            tracing::trace!(elapsed_ms, due_at, "no sample due");
            return Vec::new();
        }
        self.last_sample_ms = elapsed_ms;

        let elapsed_seconds = elapsed_ms as f64 / 1000.0;
        let elapsed_minutes = elapsed_seconds / 60.0;
        let reading = match measured {
            None => self.simulator.sample(elapsed_seconds),
            Some((heart_rate_bpm, temperature)) => ExerciseReading {
                duration_minutes: elapsed_minutes,
                heart_rate_bpm,
                body_temperature_c: temperature.unwrap_or_else(|| {
                    self.simulator
                        .body_temperature(heart_rate_bpm, elapsed_minutes)
                }),
            },
        };
        let estimate = self.estimate(&reading);
        let at = self.timestamp();

        let intensity = self
            .workout
            .intensity_at(self.simulator.elapsed_fraction(elapsed_seconds))
            .intensity;

        let sample = self.history.len() + 1;
        self.history.push(HistoryEntry {
            sample,
            elapsed_seconds,
            timestamp: at,
            reading,
            estimate: estimate.clone(),
            intensity,
        });
        self.last_reading = Some(reading);
        self.last_estimate = Some(estimate.clone());
        tracing::debug!(
            sample,
            elapsed_seconds,
            kcal = estimate.value_kcal,
            method = ?estimate.method,
            "sample recorded"
        );

        let mut events = vec![Event::SampleRecorded {
            sample,
            elapsed_seconds,
            reading,
            estimate: estimate.clone(),
            at,
        }];

        let every = self.config.training.coach_every_samples.max(1) as usize;
        if sample % every == 0 {
            let kind = self.coach.next_automatic_type(estimate.value_kcal);
            events.push(self.emit_coach(kind));
        }
        events
    }

    fn estimate(&self, reading: &ExerciseReading) -> CalorieEstimate {
        self.estimator.estimate_with_met(
            &self.user,
            reading,
            self.prefer_model,
            Some(self.workout.met),
        )
    }

    fn coach_context(&self) -> CoachContext {
        let progress = self.progress();
        CoachContext {
            user_name: self.user.name().to_string(),
            calories_burned: self.calories_burned(),
            target_calories: self.target_calories,
            elapsed_minutes: self.timer.elapsed_minutes(),
            completion_percent: progress.progress_percent,
            duration_complete: progress.is_complete,
        }
    }

    fn emit_coach(&mut self, kind: MessageType) -> Event {
        let ctx = self.coach_context();
        let text = self.coach.generate(kind, &ctx);
        let elapsed_seconds = self.timer.elapsed_seconds();
        let at = self.timestamp();

        let queued_for_speech = match self.speech.as_mut() {
            Some(queue) => match queue.enqueue(&text) {
                Ok(queued) => queued,
                Err(e) => {
                    tracing::warn!(error = %e, "coach message not spoken");
                    false
                }
            },
            None => false,
        };

        self.coach_log.push(CoachLogEntry {
            elapsed_seconds,
            timestamp: at,
            kind,
            text: text.clone(),
        });
        Event::CoachMessage {
            kind,
            text,
            elapsed_seconds,
            queued_for_speech,
            at,
        }
    }

    fn build_summary(&self) -> SessionSummary {
        let progress = self.progress();
        let total_calories = round1(self.calories_burned());
        let stats = if self.history.is_empty() {
            ReadingStats::from_readings(self.last_reading.iter())
        } else {
            ReadingStats::from_readings(self.history.iter().map(|h| &h.reading))
        };
        SessionSummary {
            session_id: self.id,
            user_name: self.user.name().to_string(),
            profile_key: self.workout.key.clone(),
            profile_name: self.workout.name.clone(),
            started_at: self.started_at,
            ended_at: self.timestamp(),
            duration_seconds: progress.elapsed_seconds,
            duration_formatted: progress.formatted_time,
            target_minutes: self.target_minutes,
            completion_percent: round1(progress.progress_percent),
            total_calories,
            target_calories: round1(self.target_calories),
            goal_achieved: self.calories_burned() >= self.target_calories,
            method: self
                .last_estimate
                .as_ref()
                .map_or(CalorieMethod::Formula, |e| e.method),
            stats,
            sample_count: self.history.len(),
            coach_message_count: self.coach_log.len(),
        }
    }

    /// Wall time derived from the session clock, so accelerated sessions
    /// get consistent timestamps.
    fn timestamp(&self) -> DateTime<Utc> {
        match self.started_at {
            Some(started) => {
                let offset = self.clock.now_ms().saturating_sub(self.clock_at_start_ms);
                started + chrono::Duration::milliseconds(offset as i64)
            }
            None => Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::Locale;
    use crate::estimator::default_foods;
    use crate::profile::{ProfileInput, Sex};
    use crate::timer::ManualClock;

    fn session_with(config: AppConfig, target_minutes: u32) -> (TrainingSession, ManualClock) {
        let config = Arc::new(config);
        let user = ProfileInput {
            name: "Ana".into(),
            surname: String::new(),
            sex: Sex::Female,
            age: 28,
            height_cm: 165.0,
            weight_kg: 60.0,
        }
        .validate(&config.inputs)
        .unwrap();
        let clock = ManualClock::new();
        let session = TrainingSession::new(
            config,
            user,
            SessionOptions {
                profile_key: Some("constant".into()),
                target_minutes: Some(target_minutes),
                prefer_model: Some(false),
                seed: Some(9),
            },
        )
        .unwrap()
        .with_clock(Arc::new(clock.clone()))
        .with_coach(Coach::offline(Locale::En, default_foods(), Some(9)))
        .with_speech(None);
        (session, clock)
    }

    fn session(target_minutes: u32) -> (TrainingSession, ManualClock) {
        session_with(AppConfig::default(), target_minutes)
    }

    #[test]
    fn ticks_before_interval_do_nothing() {
        let (mut s, clock) = session(10);
        s.start().unwrap();
        clock.advance_secs(29);
        assert!(s.tick().is_empty());
        clock.advance_secs(1);
        let events = s.tick();
        assert!(matches!(events[0], Event::SampleRecorded { sample: 1, .. }));
        assert!(matches!(events[1], Event::CoachMessage { .. }));
        assert!(s.tick().is_empty());
    }

    #[test]
    fn ticks_ignored_when_not_running() {
        let (mut s, clock) = session(10);
        clock.advance_secs(60);
        assert!(s.tick().is_empty());
        s.start().unwrap();
        s.pause().unwrap();
        clock.advance_secs(60);
        assert!(s.tick().is_empty());
        assert!(s.history().is_empty());
    }

    #[test]
    fn coach_every_n_samples() {
        let mut config = AppConfig::default();
        config.training.coach_every_samples = 3;
        let (mut s, clock) = session_with(config, 10);
        s.start().unwrap();
        for _ in 0..6 {
            clock.advance_secs(30);
            s.tick();
        }
        assert_eq!(s.history().len(), 6);
        assert_eq!(s.coach_log().len(), 2);
    }

    #[test]
    fn manual_reading_is_validated_and_used() {
        let (mut s, clock) = session(10);
        s.start().unwrap();
        clock.advance_secs(30);
        let err = s.tick_with(ReadingInput::HeartRate(250)).unwrap_err();
        assert_eq!(err.field(), "heart_rate_bpm");
        assert!(s.history().is_empty());

        let events = s
            .tick_with(ReadingInput::Manual {
                heart_rate_bpm: 120,
                body_temperature_c: 37.3,
            })
            .unwrap();
        assert!(!events.is_empty());
        let reading = s.history()[0].reading;
        assert_eq!(reading.heart_rate_bpm, 120);
        assert_eq!(reading.body_temperature_c, 37.3);
        assert!((reading.duration_minutes - 0.5).abs() < 1e-9);
    }

    #[test]
    fn stop_from_idle_then_again_fails() {
        let (mut s, _clock) = session(10);
        let events = s.stop().unwrap();
        assert!(matches!(events.last(), Some(Event::SessionStopped { .. })));
        let summary = s.summary().unwrap();
        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.duration_seconds, 0.0);
        assert_eq!(summary.coach_message_count, 1);

        let err = s.stop().unwrap_err();
        assert_eq!(err.state, TimerState::Stopped);
        assert!(s.start().is_err());
    }

    #[test]
    fn final_estimate_is_not_appended() {
        let (mut s, clock) = session(10);
        s.start().unwrap();
        clock.advance_secs(30);
        s.tick();
        clock.advance_secs(20);
        s.stop().unwrap();
        assert_eq!(s.history().len(), 1);
        let summary = s.summary().unwrap();
        assert_eq!(summary.duration_seconds, 50.0);
        assert!(summary.total_calories >= s.history()[0].estimate.value_kcal - 0.1);
    }

    #[test]
    fn unknown_profile_is_rejected() {
        let config = Arc::new(AppConfig::default());
        let user = ProfileInput {
            name: "Ana".into(),
            surname: String::new(),
            sex: Sex::Female,
            age: 28,
            height_cm: 165.0,
            weight_kg: 60.0,
        }
        .validate(&config.inputs)
        .unwrap();
        let err = TrainingSession::new(
            config,
            user,
            SessionOptions {
                profile_key: Some("rowing".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.field(), "profile");
    }

    #[test]
    fn inverted_temperature_bounds_are_rejected() {
        let mut config = AppConfig::default();
        config.training.temperature_min = 39.0;
        config.training.temperature_max = 37.0;
        let user = ProfileInput {
            name: "Ana".into(),
            surname: String::new(),
            sex: Sex::Female,
            age: 28,
            height_cm: 165.0,
            weight_kg: 60.0,
        }
        .validate(&config.inputs)
        .unwrap();
        let err = TrainingSession::new(Arc::new(config), user, SessionOptions::default())
            .unwrap_err();
        assert_eq!(err.field(), "training.temperature_min");
    }

    #[test]
    fn timestamps_follow_session_clock() {
        let (mut s, clock) = session(10);
        s.start().unwrap();
        clock.advance_secs(90);
        s.tick();
        s.stop().unwrap();
        let summary = s.summary().unwrap();
        let started = summary.started_at.unwrap();
        assert_eq!(s.history()[0].timestamp, started + chrono::Duration::seconds(90));
        assert_eq!(summary.ended_at, started + chrono::Duration::seconds(90));
    }
}
