//! Integration tests for live training sessions.

use std::sync::{Arc, Mutex};

use caloriecoach_core::estimator::default_foods;
use caloriecoach_core::speech::Utterance;
use caloriecoach_core::{
    AppConfig, BiometricSimulator, Coach, Event, ExternalServiceError, Locale, ManualClock,
    MessageType, ProfileInput, SessionExport, SessionOptions, Sex, SpeechBackend, SpeechQueue,
    TimerState, TrainingSession, UserProfile, VoiceGender, WorkoutCatalog,
};
use proptest::prelude::*;

fn athlete(config: &AppConfig) -> UserProfile {
    ProfileInput {
        name: "Marta".into(),
        surname: "Ruiz".into(),
        sex: Sex::Female,
        age: 34,
        height_cm: 168.0,
        weight_kg: 63.0,
    }
    .validate(&config.inputs)
    .unwrap()
}

fn new_session(profile: &str, target_minutes: u32) -> (TrainingSession, ManualClock) {
    let config = AppConfig::default();
    let user = athlete(&config);
    let clock = ManualClock::starting_at(1_000_000);
    let session = TrainingSession::new(
        Arc::new(config),
        user,
        SessionOptions {
            profile_key: Some(profile.into()),
            target_minutes: Some(target_minutes),
            prefer_model: Some(false),
            seed: Some(2024),
        },
    )
    .unwrap()
    .with_clock(Arc::new(clock.clone()))
    .with_coach(Coach::offline(Locale::Es, default_foods(), Some(7)))
    .with_speech(None);
    (session, clock)
}

#[test]
fn test_ten_minute_constant_session() {
    let (mut session, clock) = new_session("constant", 10);
    session.start().unwrap();

    for _ in 0..20 {
        clock.advance_secs(30);
        session.tick();
    }
    assert_eq!(session.history().len(), 20);

    let events = session.stop().unwrap();
    let Some(Event::SessionStopped { summary, .. }) = events.last() else {
        panic!("expected SessionStopped, got {events:?}");
    };
    assert!((summary.duration_seconds - 600.0).abs() < 1.0);
    assert_eq!(summary.sample_count, 20);
    assert_eq!(summary.completion_percent, 100.0);
    assert_eq!(summary.duration_formatted, "00:10:00");
    // 20 automatic messages plus the closing one
    assert_eq!(summary.coach_message_count, 21);
    assert!(summary.total_calories > 0.0);
    assert_eq!(session.history().len(), 20);
}

fn closing_message(events: &[Event]) -> &str {
    match events.first() {
        Some(Event::CoachMessage {
            kind: MessageType::Encouragement,
            text,
            ..
        }) => text,
        other => panic!("expected closing encouragement, got {other:?}"),
    }
}

#[test]
fn test_full_duration_below_calorie_target_is_congratulated() {
    let (mut session, clock) = new_session("walk", 30);
    session.start().unwrap();
    for _ in 0..60 {
        clock.advance_secs(30);
        session.tick();
    }
    let events = session.stop().unwrap();

    let summary = session.summary().unwrap();
    assert_eq!(summary.completion_percent, 100.0);
    assert!(summary.total_calories < summary.target_calories);
    assert!(!summary.goal_achieved);
    let text = closing_message(&events);
    assert!(text.starts_with("¡Felicidades Marta!"), "{text}");
}

#[test]
fn test_early_stop_is_not_congratulated() {
    let (mut session, clock) = new_session("run", 30);
    session.start().unwrap();
    for _ in 0..10 {
        clock.advance_secs(30);
        session.tick();
    }
    let events = session.stop().unwrap();
    assert!(!closing_message(&events).contains("Felicidades"));
}

#[test]
fn test_history_carries_planned_intensity() {
    let (mut session, clock) = new_session("constant", 10);
    session.start().unwrap();
    clock.advance_secs(30);
    session.tick();
    assert!((session.history()[0].intensity - 0.55).abs() < 1e-9);
}

#[test]
fn test_paused_time_is_excluded() {
    let (mut session, clock) = new_session("jog", 30);
    session.start().unwrap();
    clock.advance_secs(60);
    session.pause().unwrap();
    clock.advance_secs(60);
    session.resume().unwrap();
    clock.advance_secs(60);
    session.stop().unwrap();

    assert!((session.elapsed_seconds() - 120.0).abs() < 1e-6);
    assert_eq!(session.summary().unwrap().duration_seconds, 120.0);
}

#[test]
fn test_elapsed_is_frozen_while_paused() {
    let (mut session, clock) = new_session("walk", 30);
    session.start().unwrap();
    clock.advance_secs(45);
    session.pause().unwrap();
    let frozen = session.elapsed_seconds();
    clock.advance_secs(300);
    assert_eq!(session.elapsed_seconds(), frozen);
    assert!(session.tick().is_empty());
}

#[test]
fn test_invalid_transitions() {
    let (mut session, _clock) = new_session("run", 20);
    assert!(session.pause().is_err());
    assert!(session.resume().is_err());

    session.start().unwrap();
    let err = session.start().unwrap_err();
    assert_eq!(err.operation, "start");
    assert_eq!(err.state, TimerState::Running);
    assert!(session.resume().is_err());

    session.pause().unwrap();
    assert!(session.pause().is_err());

    session.stop().unwrap();
    assert!(session.stop().is_err());
    assert!(session.resume().is_err());
    assert!(session.tick().is_empty());
    assert_eq!(session.status(), TimerState::Stopped);
}

#[test]
fn test_history_is_append_only_and_monotonic() {
    let (mut session, clock) = new_session("hiit", 15);
    session.start().unwrap();
    let mut seen = Vec::new();
    for step in 0..12 {
        clock.advance_secs(17);
        session.tick();
        if step == 5 {
            session.pause().unwrap();
            clock.advance_secs(100);
            session.resume().unwrap();
        }
        let snapshot = session.snapshot();
        assert!(snapshot.history.starts_with(&seen));
        seen = snapshot.history;
    }
    assert!(seen
        .windows(2)
        .all(|w| w[0].elapsed_seconds < w[1].elapsed_seconds));
}

#[test]
fn test_export_contains_history_and_summary() {
    let (mut session, clock) = new_session("pyramid", 5);
    session.start().unwrap();
    for _ in 0..4 {
        clock.advance_secs(30);
        session.tick();
    }
    session.request_coach_message(MessageType::Nutrition);
    session.stop().unwrap();

    let json = session.export().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["history"].as_array().unwrap().len(), 4);
    assert_eq!(value["summary"]["sample_count"], 4);
    assert_eq!(value["summary"]["profile_key"], "pyramid");
    assert!(value["summary"]["avg_heart_rate"].is_number());
    assert_eq!(value["coach_log"].as_array().unwrap().len(), 6);

    let parsed: SessionExport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.history.len(), 4);
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl SpeechBackend for Recorder {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), ExternalServiceError> {
        self.0.lock().unwrap().push(utterance.text.clone());
        Ok(())
    }
}

#[test]
fn test_coach_messages_reach_speech_queue() {
    let recorder = Recorder::default();
    let queue = SpeechQueue::spawn(recorder.clone(), 16, Locale::Es, VoiceGender::Female).unwrap();
    let (session, clock) = new_session("constant", 10);
    let mut session = session.with_speech(Some(queue));

    session.start().unwrap();
    let mut events = Vec::new();
    for _ in 0..3 {
        clock.advance_secs(30);
        events.extend(session.tick());
    }
    events.extend(session.stop().unwrap());
    // dropping the session joins the speech worker
    drop(session);

    let queued = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                Event::CoachMessage {
                    queued_for_speech: true,
                    ..
                }
            )
        })
        .count();
    let spoken = recorder.0.lock().unwrap();
    assert!(queued >= 1);
    assert_eq!(spoken.len(), queued);
}

#[test]
fn test_custom_profile_from_config() {
    let mut config = AppConfig::default();
    let mut swim = WorkoutCatalog::default().get("constant").unwrap().clone();
    swim.key = "swim".into();
    swim.name = "Pool Swim".into();
    swim.met = 5.8;
    config.profiles.push(swim);
    config.validate().unwrap();

    let user = athlete(&config);
    let session = TrainingSession::new(
        Arc::new(config),
        user,
        SessionOptions {
            profile_key: Some("swim".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(session.workout().name, "Pool Swim");
    assert_eq!(session.target_minutes(), 30);
}

proptest! {
    #[test]
    fn simulator_readings_stay_in_bounds(
        seed in any::<u64>(),
        profile_index in 0usize..7,
        age in 10u32..=100,
        weight in 30.0f64..=300.0,
        elapsed in 0.0f64..=7200.0,
    ) {
        let catalog = WorkoutCatalog::default();
        let profile = catalog.list()[profile_index].clone();
        let config = AppConfig::default();
        let user = ProfileInput {
            name: "P".into(),
            surname: String::new(),
            sex: Sex::Male,
            age,
            height_cm: 170.0,
            weight_kg: weight,
        }
        .validate(&config.inputs)
        .unwrap();
        let mut sim = BiometricSimulator::new(&config.training, profile, &user, 30.0, Some(seed));
        let reading = sim.sample(elapsed);
        prop_assert!((60..=220).contains(&reading.heart_rate_bpm));
        prop_assert!((36.0..=40.0).contains(&reading.body_temperature_c));
        prop_assert!(reading.duration_minutes >= 0.0);
    }
}
