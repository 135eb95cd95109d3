//! Prompts sent to the chat-completion API.

use indoc::formatdoc;

use super::{CoachContext, MessageType};
use super::locale::Locale;

/// Prompt for `kind`, or `None` for types that are always templated.
pub fn build(kind: MessageType, ctx: &CoachContext, locale: Locale) -> Option<String> {
    let lang = locale.language_name();
    let name = ctx.display_name(locale);
    let prompt = match kind {
        MessageType::Motivation => formatdoc! {"
            You are an energetic and motivating personal coach. Respond ONLY in {lang}. The user {name} is training:
            - Has burned {calories:.0} calories in {minutes:.0} minutes
            - Target is {target:.0} calories
            - Progress: {percent:.1}%

            IMPORTANT: Generate an ULTRA SHORT energetic message (maximum 1 line, 10 words) in {lang} to encourage them.
            DO NOT use emojis. Use only words. Be professional and motivating.",
            calories = ctx.calories_burned,
            minutes = ctx.elapsed_minutes,
            target = ctx.target_calories,
            percent = ctx.calorie_percent(),
        },
        MessageType::Progress => formatdoc! {"
            You are a personal coach. Respond ONLY in {lang}.
            {name} has burned {calories:.0} kcal, {percent:.1}% of the goal.
            Give an ULTRA SHORT progress update (maximum 1 line, 10 words).
            DO NOT use emojis. Use only words.",
            calories = ctx.calories_burned,
            percent = ctx.calorie_percent(),
        },
        MessageType::Nutrition => formatdoc! {"
            You are a sports nutritionist. Respond ONLY in {lang}.
            The user burned {calories:.0} calories.
            Give an ULTRA SHORT nutrition tip (maximum 1 line, 10 words) for post-workout recovery.
            DO NOT use emojis. Use only words. Be professional and clear.",
            calories = ctx.calories_burned,
        },
        MessageType::Wellness => formatdoc! {"
            You are a life and wellness coach. Respond ONLY in {lang}.
            Give an ULTRA SHORT tip (maximum 1 line, 10 words) about living happy and healthy.
            DO NOT use emojis. Use only words. Be professional and motivating."
        },
        MessageType::Encouragement if !ctx.duration_complete => formatdoc! {"
            You are an empathetic and motivating coach. Respond ONLY in {lang}.
            The user {name} stopped the workout after completing {percent:.0}% of the goal.
            Generate an ULTRA SHORT positive message (maximum 1 line, 10 words).
            DO NOT use emojis. Use only words. Be empathetic and professional.",
            percent = ctx.completion_percent,
        },
        MessageType::Encouragement | MessageType::FoodComparison => return None,
    };
    Some(prompt)
}
