//! Coach against a mocked chat-completion endpoint.

use std::net::TcpListener;
use std::time::{Duration, Instant};

use caloriecoach_core::coach::OpenRouterClient;
use caloriecoach_core::estimator::default_foods;
use caloriecoach_core::storage::CoachConfig;
use caloriecoach_core::{Coach, CoachContext, Locale, MessageType};

fn context() -> CoachContext {
    CoachContext {
        user_name: "Ana".into(),
        calories_burned: 120.0,
        target_calories: 300.0,
        elapsed_minutes: 12.0,
        completion_percent: 40.0,
        duration_complete: false,
    }
}

fn remote_coach(url: String, seed: u64) -> Coach {
    remote_coach_with_timeout(url, seed, 5)
}

fn remote_coach_with_timeout(url: String, seed: u64, timeout_secs: u64) -> Coach {
    let config = CoachConfig {
        base_url: url,
        timeout_secs,
        ..CoachConfig::default()
    };
    let client = OpenRouterClient::new(&config, "test-key").unwrap();
    Coach::offline(Locale::En, default_foods(), Some(seed)).with_remote(client)
}

#[test]
fn test_remote_reply_is_cleaned_and_returned() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/chat")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"  [INST]Great pace,\n Ana!  "}}]}"#)
        .expect(1)
        .create();

    let mut coach = remote_coach(format!("{}/chat", server.url()), 1);
    assert!(coach.is_remote());
    let text = coach.generate(MessageType::Motivation, &context());

    mock.assert();
    assert_eq!(text, "Great pace, Ana!");
}

#[test]
fn test_server_error_falls_back_to_template() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/chat")
        .with_status(500)
        .with_body("boom")
        .create();

    let mut coach = remote_coach(format!("{}/chat", server.url()), 3);
    let text = coach.generate(MessageType::Nutrition, &context());

    // Template selection does not depend on the failed call.
    let mut offline = Coach::offline(Locale::En, default_foods(), Some(3));
    mock.assert();
    assert!(!text.is_empty());
    assert_eq!(text, offline.generate(MessageType::Nutrition, &context()));
}

#[test]
fn test_empty_completion_falls_back_to_template() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/chat")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"<s></s>"}}]}"#)
        .create();

    let mut coach = remote_coach(format!("{}/chat", server.url()), 9);
    let text = coach.generate(MessageType::Wellness, &context());

    let mut offline = Coach::offline(Locale::En, default_foods(), Some(9));
    assert_eq!(text, offline.generate(MessageType::Wellness, &context()));
}

#[test]
fn test_food_comparison_never_calls_remote() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/chat").expect(0).create();

    let mut coach = remote_coach(format!("{}/chat", server.url()), 5);
    let mut ctx = context();
    ctx.calories_burned = 230.0;
    let text = coach.generate(MessageType::FoodComparison, &ctx);

    mock.assert();
    assert!(text.contains("chocolate bar"), "{text}");
}

#[test]
fn test_silent_server_times_out_to_template() {
    // Accepts connections (kernel backlog) but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/chat", listener.local_addr().unwrap());

    let mut coach = remote_coach_with_timeout(url, 4, 1);
    let started = Instant::now();
    let text = coach.generate(MessageType::Nutrition, &context());
    let elapsed = started.elapsed();

    let mut offline = Coach::offline(Locale::En, default_foods(), Some(4));
    assert_eq!(text, offline.generate(MessageType::Nutrition, &context()));
    assert!(elapsed < Duration::from_secs(3), "took {elapsed:?}");
    drop(listener);
}

#[test]
fn test_unreachable_server_falls_back_to_template() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut coach = remote_coach_with_timeout(format!("http://127.0.0.1:{port}/chat"), 6, 2);
    let text = coach.generate(MessageType::Progress, &context());

    let mut offline = Coach::offline(Locale::En, default_foods(), Some(6));
    assert_eq!(text, offline.generate(MessageType::Progress, &context()));
}
