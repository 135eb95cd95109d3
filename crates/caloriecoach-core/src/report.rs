//! Plain-text rendering of estimates and session summaries.

use std::fmt::Write;

use crate::estimator::{top_food_equivalents, CalorieEstimate, CalorieMethod, FoodItem};
use crate::profile::{ExerciseReading, UserProfile};
use crate::session::{CoachLogEntry, SessionSummary};
use crate::timer::format_hms;

const TOP_FOODS: usize = 3;

fn method_label(estimate: &CalorieEstimate) -> String {
    match (estimate.method, &estimate.model_name) {
        (CalorieMethod::Model, Some(name)) => format!("model ({name})"),
        (CalorieMethod::Model, None) => "model".into(),
        (CalorieMethod::Formula, _) => "formula".into(),
    }
}

fn opt<T: std::fmt::Display>(value: Option<T>, unit: &str) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v}{unit}"))
}

/// One estimate with its inputs and food equivalents.
pub fn render_estimate(
    user: &UserProfile,
    reading: &ExerciseReading,
    estimate: &CalorieEstimate,
    foods: &[FoodItem],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Calories burned: {:.1} kcal", estimate.value_kcal);
    let _ = writeln!(out, "Method:          {}", method_label(estimate));
    let _ = writeln!(
        out,
        "Inputs:          {} {}y {:.0}cm {:.1}kg, {:.0} min @ {} bpm, {:.1} °C",
        user.sex(),
        user.age(),
        user.height_cm(),
        user.weight_kg(),
        reading.duration_minutes,
        reading.heart_rate_bpm,
        reading.body_temperature_c,
    );
    let top = top_food_equivalents(estimate.value_kcal, foods, TOP_FOODS);
    if !top.is_empty() {
        let _ = writeln!(out, "Equivalent to:");
        for food in top {
            let _ = writeln!(out, "  {:>3} x {}", food.count, food.name);
        }
    }
    out
}

/// Session summary followed by the coach log.
pub fn render_session(summary: &SessionSummary, coach_log: &[CoachLogEntry]) -> String {
    let s = &summary.stats;
    let mut out = String::new();
    let _ = writeln!(out, "Session {}", summary.session_id);
    let _ = writeln!(out, "  athlete     {}", summary.user_name);
    let _ = writeln!(out, "  workout     {} ({})", summary.profile_name, summary.profile_key);
    let _ = writeln!(
        out,
        "  duration    {} of {} min ({:.1}%)",
        summary.duration_formatted, summary.target_minutes, summary.completion_percent
    );
    let _ = writeln!(
        out,
        "  calories    {:.1} / {:.1} kcal [{}]{}",
        summary.total_calories,
        summary.target_calories,
        match summary.method {
            CalorieMethod::Model => "model",
            CalorieMethod::Formula => "formula",
        },
        if summary.goal_achieved { "  goal reached" } else { "" }
    );
    let _ = writeln!(
        out,
        "  heart rate  avg {} min {} max {}",
        opt(s.avg_heart_rate, ""),
        opt(s.min_heart_rate, ""),
        opt(s.max_heart_rate, "")
    );
    let _ = writeln!(
        out,
        "  body temp   avg {} max {}",
        opt(s.avg_temperature, " °C"),
        opt(s.max_temperature, " °C")
    );
    let _ = writeln!(
        out,
        "  samples     {}, coach messages {}",
        summary.sample_count, summary.coach_message_count
    );
    if !coach_log.is_empty() {
        let _ = writeln!(out, "Coach:");
        for entry in coach_log {
            let _ = writeln!(
                out,
                "  [{}] {:<15} {}",
                format_hms(entry.elapsed_seconds as u64),
                entry.kind.as_str(),
                entry.text
            );
        }
    }
    out
}
