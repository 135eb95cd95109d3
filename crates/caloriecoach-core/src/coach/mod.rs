//! Motivational coach.
//!
//! Messages come from the chat-completion API when a key is configured and
//! the call succeeds, otherwise from the localized template pools. The
//! coach never fails: API errors are logged and the template is used.

mod locale;
mod openrouter;
mod prompts;

pub use locale::{render, Locale, Phrase, Pool, TemplateVars};
pub use openrouter::{clean_reply, OpenRouterClient};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::estimator::{closest_food, FoodItem};
use crate::storage::AppConfig;

/// Chance of a calorie-dependent message when calories are available.
const CALORIE_TYPE_PROBABILITY: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Motivation,
    Progress,
    Nutrition,
    FoodComparison,
    Encouragement,
    Wellness,
}

impl MessageType {
    pub const ALL: [MessageType; 6] = [
        MessageType::Motivation,
        MessageType::Progress,
        MessageType::Nutrition,
        MessageType::FoodComparison,
        MessageType::Encouragement,
        MessageType::Wellness,
    ];

    const CALORIE_DEPENDENT: [MessageType; 3] = [
        MessageType::Motivation,
        MessageType::Progress,
        MessageType::FoodComparison,
    ];

    const GENERAL: [MessageType; 2] = [MessageType::Nutrition, MessageType::Wellness];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Motivation => "motivation",
            MessageType::Progress => "progress",
            MessageType::Nutrition => "nutrition",
            MessageType::FoodComparison => "food_comparison",
            MessageType::Encouragement => "encouragement",
            MessageType::Wellness => "wellness",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        MessageType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "message_type".into(),
                message: format!("unknown message type '{s}'"),
            })
    }
}

/// What the coach knows about the session when asked for a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachContext {
    pub user_name: String,
    pub calories_burned: f64,
    pub target_calories: f64,
    pub elapsed_minutes: f64,
    /// Share of the target duration completed, 0..=100.
    pub completion_percent: f64,
    /// The whole target duration was trained. Decides between
    /// congratulations and "stopped early" at the end of a session.
    pub duration_complete: bool,
}

impl CoachContext {
    /// Calories burned as a percentage of the calorie target.
    pub fn calorie_percent(&self) -> f64 {
        if self.target_calories > 0.0 {
            self.calories_burned / self.target_calories * 100.0
        } else {
            0.0
        }
    }

    fn display_name(&self, locale: Locale) -> &str {
        let name = self.user_name.trim();
        if name.is_empty() {
            locale.default_user_name()
        } else {
            name
        }
    }
}

#[derive(Debug)]
pub struct Coach {
    locale: Locale,
    remote: Option<OpenRouterClient>,
    foods: Vec<FoodItem>,
    rng: Mcg128Xsl64,
    last_template: HashMap<Pool, usize>,
    last_automatic: Option<MessageType>,
}

impl Coach {
    /// Template-only coach.
    pub fn offline(locale: Locale, foods: Vec<FoodItem>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            locale,
            remote: None,
            foods,
            rng,
            last_template: HashMap::new(),
            last_automatic: None,
        }
    }

    pub fn with_remote(mut self, client: OpenRouterClient) -> Self {
        self.remote = Some(client);
        self
    }

    /// Coach for `config`, using the API when its key variable is set.
    pub fn from_config(config: &AppConfig, seed: Option<u64>) -> Self {
        let coach = Self::offline(config.coach.language, config.foods.clone(), seed);
        let Some(key) = config.api_key() else {
            tracing::debug!(env = %config.coach.api_key_env, "no coach API key, templates only");
            return coach;
        };
        match OpenRouterClient::new(&config.coach, key) {
            Ok(client) => coach.with_remote(client),
            Err(e) => {
                tracing::warn!(error = %e, "coach API unavailable, templates only");
                coach
            }
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Message of type `kind`. Never fails.
    pub fn generate(&mut self, kind: MessageType, ctx: &CoachContext) -> String {
        if let Some(client) = &self.remote {
            if let Some(prompt) = prompts::build(kind, ctx, self.locale) {
                match client.complete(&prompt) {
                    Ok(text) => return text,
                    Err(e) => {
                        tracing::warn!(kind = %kind, error = %e, "coach API failed, using template");
                    }
                }
            }
        }
        self.templated(kind, ctx)
    }

    /// Next type for an automatic message. Calorie-dependent types are
    /// picked 60% of the time once calories are known; the same automatic
    /// type is never picked twice in a row.
    pub fn next_automatic_type(&mut self, calories_burned: f64) -> MessageType {
        let calorie_based = calories_burned > 0.0 && self.rng.gen_bool(CALORIE_TYPE_PROBABILITY);
        let group: &[MessageType] = if calorie_based {
            &MessageType::CALORIE_DEPENDENT
        } else {
            &MessageType::GENERAL
        };
        let candidates: Vec<MessageType> = group
            .iter()
            .copied()
            .filter(|t| Some(*t) != self.last_automatic)
            .collect();
        let kind = candidates
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(group[0]);
        self.last_automatic = Some(kind);
        kind
    }

    fn templated(&mut self, kind: MessageType, ctx: &CoachContext) -> String {
        let locale = self.locale;
        let name = ctx.display_name(locale).to_string();
        let percent = ctx.calorie_percent();
        let vars = TemplateVars {
            name: &name,
            percent,
            calories: ctx.calories_burned,
            remaining: ctx.target_calories - ctx.calories_burned,
            ..Default::default()
        };

        match kind {
            MessageType::Motivation => {
                let pool = if percent < 25.0 {
                    Pool::MotivationLow
                } else if percent < 50.0 {
                    Pool::MotivationMid
                } else if percent < 75.0 {
                    Pool::MotivationHigh
                } else {
                    Pool::MotivationVeryHigh
                };
                self.pick(pool, &vars)
            }
            MessageType::Progress => self.pick(Pool::Progress, &vars),
            MessageType::Nutrition => self.pick(Pool::Nutrition, &vars),
            MessageType::Wellness => self.pick(Pool::Wellness, &vars),
            MessageType::Encouragement if ctx.duration_complete => {
                render(locale::phrase(locale, Phrase::Congratulations), &vars)
            }
            MessageType::Encouragement => {
                let completed = ctx.completion_percent;
                let pool = if completed > 80.0 {
                    Pool::EncouragementHigh
                } else if completed > 50.0 {
                    Pool::EncouragementMid
                } else {
                    Pool::EncouragementLow
                };
                let vars = TemplateVars {
                    percent: completed,
                    ..vars
                };
                self.pick(pool, &vars)
            }
            MessageType::FoodComparison => self.food_comparison(ctx, vars),
        }
    }

    fn food_comparison(&self, ctx: &CoachContext, vars: TemplateVars<'_>) -> String {
        let calories = ctx.calories_burned;
        let Some(food) = closest_food(calories, &self.foods) else {
            return render(locale::phrase(self.locale, Phrase::FoodDefault), &vars);
        };
        let vars = TemplateVars {
            food: &food.name,
            food_cals: food.kcal,
            percent: calories / food.kcal * 100.0,
            ..vars
        };
        let phrase = if calories >= food.kcal {
            Phrase::FoodExceeded
        } else {
            Phrase::FoodProgress
        };
        render(locale::phrase(self.locale, phrase), &vars)
    }

    /// Random template from `pool`, never the one picked last time.
    fn pick(&mut self, pool: Pool, vars: &TemplateVars<'_>) -> String {
        let templates = locale::pool(self.locale, pool);
        let index = match (templates.len(), self.last_template.get(&pool)) {
            (0, _) => return String::new(),
            (1, _) | (_, None) => self.rng.gen_range(0..templates.len()),
            (len, Some(&last)) => {
                let i = self.rng.gen_range(0..len - 1);
                if i >= last {
                    i + 1
                } else {
                    i
                }
            }
        };
        self.last_template.insert(pool, index);
        render(templates[index], vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::default_foods;

    fn coach(locale: Locale) -> Coach {
        Coach::offline(locale, default_foods(), Some(42))
    }

    fn ctx(calories: f64, target: f64) -> CoachContext {
        CoachContext {
            user_name: "Ana".into(),
            calories_burned: calories,
            target_calories: target,
            elapsed_minutes: 10.0,
            completion_percent: 50.0,
            duration_complete: false,
        }
    }

    #[test]
    fn never_repeats_template_back_to_back() {
        let mut coach = coach(Locale::En);
        let c = ctx(100.0, 300.0);
        let mut previous = String::new();
        for _ in 0..50 {
            let msg = coach.generate(MessageType::Wellness, &c);
            assert_ne!(msg, previous);
            previous = msg;
        }
    }

    #[test]
    fn motivation_band_follows_calorie_percent() {
        let mut coach = coach(Locale::En);
        let low = locale::pool(Locale::En, Pool::MotivationLow);
        let rendered: Vec<String> = low
            .iter()
            .map(|t| render(t, &TemplateVars { name: "Ana", ..Default::default() }))
            .collect();
        let msg = coach.generate(MessageType::Motivation, &ctx(10.0, 300.0));
        assert!(rendered.contains(&msg), "{msg}");
    }

    #[test]
    fn duration_complete_congratulates_below_calorie_target() {
        let mut coach = coach(Locale::Es);
        let mut c = ctx(200.0, 300.0);
        c.duration_complete = true;
        let msg = coach.generate(MessageType::Encouragement, &c);
        assert_eq!(msg, "¡Felicidades Ana! Has completado tu entrenamiento. ¡Eres increíble!");
    }

    #[test]
    fn food_comparison_exceeded_and_progress() {
        let mut coach = coach(Locale::En);
        let exceeded = coach.generate(MessageType::FoodComparison, &ctx(300.0, 400.0));
        assert_eq!(
            exceeded,
            "Ana! You've burned the equivalent of pizza slice (285 kcal). Keep it up!"
        );
        let progress = coach.generate(MessageType::FoodComparison, &ctx(230.0, 400.0));
        assert_eq!(progress, "You're at 98% of chocolate bar. Keep going, Ana!");
        let early = coach.generate(MessageType::FoodComparison, &ctx(26.0, 400.0));
        assert_eq!(early, "You're at 52% of cookie. Keep going, Ana!");
    }

    #[test]
    fn empty_food_table_uses_default_phrase() {
        let mut coach = Coach::offline(Locale::Fr, Vec::new(), Some(1));
        let msg = coach.generate(MessageType::FoodComparison, &ctx(100.0, 300.0));
        assert_eq!(msg, "Tu vas très bien, Ana! Chaque calorie compte.");
    }

    #[test]
    fn automatic_type_never_repeats() {
        let mut coach = coach(Locale::Es);
        let mut last = None;
        for _ in 0..100 {
            let kind = coach.next_automatic_type(150.0);
            assert_ne!(Some(kind), last);
            assert_ne!(kind, MessageType::Encouragement);
            last = Some(kind);
        }
    }

    #[test]
    fn zero_calories_only_general_types() {
        let mut coach = coach(Locale::Es);
        for _ in 0..20 {
            let kind = coach.next_automatic_type(0.0);
            assert!(matches!(kind, MessageType::Nutrition | MessageType::Wellness));
        }
    }

    #[test]
    fn unnamed_user_gets_locale_default() {
        let mut coach = coach(Locale::Es);
        let mut c = ctx(0.0, 300.0);
        c.user_name = " ".into();
        c.duration_complete = true;
        assert!(coach.generate(MessageType::Encouragement, &c).contains("atleta"));
    }

    #[test]
    fn message_type_parses() {
        assert_eq!("food-comparison".parse::<MessageType>().unwrap(), MessageType::FoodComparison);
        assert!("jokes".parse::<MessageType>().is_err());
    }
}
