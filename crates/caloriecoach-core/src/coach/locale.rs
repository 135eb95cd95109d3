//! Fallback message templates in Spanish, English and French.
//!
//! Placeholders: `{name}`, `{percent}` (0 decimals), `{percent1}`
//! (1 decimal), `{calories}`, `{remaining}`, `{food}`, `{food_cals}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Es, Locale::En, Locale::Fr];

    /// English language name, used in API prompts.
    pub fn language_name(self) -> &'static str {
        match self {
            Locale::Es => "Spanish",
            Locale::En => "English",
            Locale::Fr => "French",
        }
    }

    /// How to address a user with no name.
    pub fn default_user_name(self) -> &'static str {
        match self {
            Locale::Es => "atleta",
            Locale::En => "athlete",
            Locale::Fr => "athlète",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "spanish" | "español" | "espanol" => Ok(Locale::Es),
            "en" | "english" => Ok(Locale::En),
            "fr" | "french" | "français" | "francais" => Ok(Locale::Fr),
            other => Err(ValidationError::InvalidValue {
                field: "language".into(),
                message: format!("unsupported language '{other}' (es, en, fr)"),
            }),
        }
    }
}

/// Template pools. Each pool has at least two entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    MotivationLow,
    MotivationMid,
    MotivationHigh,
    MotivationVeryHigh,
    Progress,
    Nutrition,
    Wellness,
    EncouragementHigh,
    EncouragementMid,
    EncouragementLow,
}

/// Single fixed phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    FoodExceeded,
    FoodProgress,
    FoodDefault,
    Congratulations,
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars<'a> {
    pub name: &'a str,
    pub percent: f64,
    pub calories: f64,
    pub remaining: f64,
    pub food: &'a str,
    pub food_cals: f64,
}

pub fn render(template: &str, vars: &TemplateVars<'_>) -> String {
    template
        .replace("{name}", vars.name)
        .replace("{percent1}", &format!("{:.1}", vars.percent))
        .replace("{percent}", &format!("{:.0}", vars.percent))
        .replace("{calories}", &format!("{:.0}", vars.calories))
        .replace("{remaining}", &format!("{:.0}", vars.remaining.max(0.0)))
        .replace("{food_cals}", &format!("{:.0}", vars.food_cals))
        .replace("{food}", vars.food)
}

pub fn pool(locale: Locale, pool: Pool) -> &'static [&'static str] {
    match locale {
        Locale::Es => es_pool(pool),
        Locale::En => en_pool(pool),
        Locale::Fr => fr_pool(pool),
    }
}

pub fn phrase(locale: Locale, phrase: Phrase) -> &'static str {
    match (locale, phrase) {
        (Locale::Es, Phrase::FoodExceeded) => {
            "¡{name}! Has quemado el equivalente a {food} ({food_cals} kcal). ¡Sigue así!"
        }
        (Locale::Es, Phrase::FoodProgress) => "Ya llevas el {percent}% de {food}. ¡Continúa, {name}!",
        (Locale::Es, Phrase::FoodDefault) => "¡Vas muy bien, {name}! Cada caloría cuenta.",
        (Locale::Es, Phrase::Congratulations) => {
            "¡Felicidades {name}! Has completado tu entrenamiento. ¡Eres increíble!"
        }
        (Locale::En, Phrase::FoodExceeded) => {
            "{name}! You've burned the equivalent of {food} ({food_cals} kcal). Keep it up!"
        }
        (Locale::En, Phrase::FoodProgress) => "You're at {percent}% of {food}. Keep going, {name}!",
        (Locale::En, Phrase::FoodDefault) => "You're doing great, {name}! Every calorie counts.",
        (Locale::En, Phrase::Congratulations) => {
            "Congratulations {name}! You've completed your workout. You're amazing!"
        }
        (Locale::Fr, Phrase::FoodExceeded) => {
            "{name}! Tu as brûlé l'équivalent de {food} ({food_cals} kcal). Continue!"
        }
        (Locale::Fr, Phrase::FoodProgress) => "Tu es à {percent}% de {food}. Continue, {name}!",
        (Locale::Fr, Phrase::FoodDefault) => "Tu vas très bien, {name}! Chaque calorie compte.",
        (Locale::Fr, Phrase::Congratulations) => {
            "Félicitations {name}! Tu as terminé ton entraînement. Tu es incroyable!"
        }
    }
}

fn es_pool(pool: Pool) -> &'static [&'static str] {
    match pool {
        Pool::MotivationLow => &[
            "¡Vamos {name}! Estás comenzando fuerte. ¡Cada paso cuenta!",
            "¡Excelente inicio, {name}! Tu cuerpo te lo agradecerá.",
            "¡Así se hace, {name}! Estás construyendo un mejor tú.",
        ],
        Pool::MotivationMid => &[
            "¡Increíble, {name}! Ya llevas {percent}%. ¡No pares ahora!",
            "¡Vas por buen camino, {name}! {percent}% completado. ¡Tú puedes!",
            "¡Mitad del camino, {name}! {calories} calorías eliminadas. ¡Sigue así!",
        ],
        Pool::MotivationHigh => &[
            "¡Wow {name}! Ya {percent}% completado. ¡Estás imparable!",
            "¡Fantástico, {name}! {calories} kcal quemadas. ¡La meta está cerca!",
            "¡Brutal, {name}! Ya casi llegas. ¡No te detengas ahora!",
        ],
        Pool::MotivationVeryHigh => &[
            "¡CASI LO LOGRAS, {name}! {percent}% ¡El último empujón!",
            "¡ERES INCREÍBLE, {name}! Solo faltan {remaining} kcal. ¡VAMOS!",
            "¡LA VICTORIA ESTÁ CERCA, {name}! {percent}% ¡TÚ PUEDES!",
        ],
        Pool::Progress => &[
            "Progreso actual: {calories} kcal ({percent1}%). ¡Sigue adelante, {name}!",
            "Llevas {calories} calorías quemadas. ¡Eso es {percent1}% del objetivo!",
            "{name}, has eliminado {calories} kcal. ¡{percent1}% completado!",
        ],
        Pool::Nutrition => &[
            "Hidratación: Bebe agua para recuperarte. Has perdido mucho líquido.",
            "Post-entrenamiento: Considera proteína + carbohidratos en los próximos 30 min.",
            "Recuperación: Un plátano y frutos secos son perfectos ahora.",
            "Rehidratación: Agua con electrolitos ayudará a tu recuperación.",
            "Proteína: Un batido de proteína optimizará tu recuperación muscular.",
            "Grasas saludables: Aguacate o nueces ayudan a la recuperación.",
        ],
        Pool::Wellness => &[
            "{name}, la felicidad está en los pequeños logros diarios. Celebra cada victoria.",
            "Cada día es una nueva oportunidad, {name}. Disfruta el proceso, no solo el resultado.",
            "Tu salud mental es tan importante como la física. Descansa cuando lo necesites.",
            "{name}, la consistencia supera la perfección. Pequeños pasos todos los días.",
            "El equilibrio es clave: ejercicio, nutrición, descanso y alegría.",
            "{name}, cada entrenamiento es una inversión en tu futuro yo. ¡Sigue adelante!",
            "Define metas, pero disfruta el camino. La vida es el viaje, no el destino.",
            "Tu cuerpo es tu templo, {name}. Cuídalo con amor y respeto.",
        ],
        Pool::EncouragementHigh => &[
            "¡{name}! Completaste {percent}%. ¡Eso es increíble! Mañana será aún mejor.",
            "¡{percent}% es EXCELENTE, {name}! Tu cuerpo te agradece. Descansa bien.",
            "¡Qué gran esfuerzo, {name}! {percent}% logrado. Estás construyendo disciplina.",
        ],
        Pool::EncouragementMid => &[
            "{name}, {percent}% es un logro real. Cada sesión cuenta. ¡Regresa pronto!",
            "¡{percent}% completado, {name}! Eso es progreso. Mañana es otro día.",
            "¡Bien hecho, {name}! {percent}% es mejor que cero. La constancia es clave.",
        ],
        Pool::EncouragementLow => &[
            "{name}, lo importante es que lo intentaste. Escucha a tu cuerpo. Vuelve cuando estés listo.",
            "¡Hey {name}! Incluso {percent}% es un paso adelante. No te presiones. Regresa fuerte.",
            "¡{name}! Tu bienestar es primero. {percent}% es mejor que nada. ¡Vuelve pronto!",
        ],
    }
}

fn en_pool(pool: Pool) -> &'static [&'static str] {
    match pool {
        Pool::MotivationLow => &[
            "Let's go {name}! You're starting strong. Every step counts!",
            "Excellent start, {name}! Your body will thank you.",
            "That's how it's done, {name}! You're building a better you.",
        ],
        Pool::MotivationMid => &[
            "Amazing, {name}! You're at {percent}%. Don't stop now!",
            "You're on the right track, {name}! {percent}% completed. You can do it!",
            "Halfway there, {name}! {calories} calories burned. Keep it up!",
        ],
        Pool::MotivationHigh => &[
            "Wow {name}! Already {percent}% complete. You're unstoppable!",
            "Fantastic, {name}! {calories} kcal burned. The goal is near!",
            "Awesome, {name}! Almost there. Don't stop now!",
        ],
        Pool::MotivationVeryHigh => &[
            "ALMOST THERE, {name}! {percent}% The final push!",
            "YOU'RE INCREDIBLE, {name}! Only {remaining} kcal left. LET'S GO!",
            "VICTORY IS NEAR, {name}! {percent}% YOU CAN DO IT!",
        ],
        Pool::Progress => &[
            "Current progress: {calories} kcal ({percent1}%). Keep going, {name}!",
            "You've burned {calories} calories. That's {percent1}% of your goal!",
            "{name}, you've eliminated {calories} kcal. {percent1}% complete!",
        ],
        Pool::Nutrition => &[
            "Hydration: Drink water to recover. You've lost a lot of fluids.",
            "Post-workout: Consider protein + carbs in the next 30 min.",
            "Recovery: A banana and nuts are perfect right now.",
            "Rehydration: Water with electrolytes will help your recovery.",
            "Protein: A protein shake will optimize your muscle recovery.",
            "Healthy fats: Avocado or nuts help with recovery.",
        ],
        Pool::Wellness => &[
            "{name}, happiness is in the small daily achievements. Celebrate every victory.",
            "Every day is a new opportunity, {name}. Enjoy the process, not just the result.",
            "Your mental health is as important as physical. Rest when you need it.",
            "{name}, consistency beats perfection. Small steps every day.",
            "Balance is key: exercise, nutrition, rest, and joy.",
            "{name}, every workout is an investment in your future self. Keep going!",
            "Set goals, but enjoy the journey. Life is the journey, not the destination.",
            "Your body is your temple, {name}. Take care of it with love and respect.",
        ],
        Pool::EncouragementHigh => &[
            "{name}! You completed {percent}%. That's incredible! Tomorrow will be even better.",
            "{percent}% is EXCELLENT, {name}! Your body thanks you. Rest well.",
            "What an effort, {name}! {percent}% done. You're building discipline.",
        ],
        Pool::EncouragementMid => &[
            "{name}, {percent}% is a real achievement. Every session counts. Come back soon!",
            "{percent}% completed, {name}! That's progress. Tomorrow is another day.",
            "Well done, {name}! {percent}% beats zero. Consistency is key.",
        ],
        Pool::EncouragementLow => &[
            "{name}, what matters is that you tried. Listen to your body. Come back when ready.",
            "Hey {name}! Even {percent}% is a step forward. No pressure. Come back strong.",
            "{name}! Your wellbeing comes first. {percent}% is better than nothing. See you soon!",
        ],
    }
}

fn fr_pool(pool: Pool) -> &'static [&'static str] {
    match pool {
        Pool::MotivationLow => &[
            "Allez {name}! Tu commences fort. Chaque pas compte!",
            "Excellent début, {name}! Ton corps te remerciera.",
            "C'est comme ça, {name}! Tu construis un meilleur toi.",
        ],
        Pool::MotivationMid => &[
            "Incroyable, {name}! Tu es à {percent}%. Ne t'arrête pas!",
            "Tu es sur la bonne voie, {name}! {percent}% complété. Tu peux le faire!",
            "À mi-chemin, {name}! {calories} calories brûlées. Continue!",
        ],
        Pool::MotivationHigh => &[
            "Wow {name}! Déjà {percent}% terminé. Tu es inarrêtable!",
            "Fantastique, {name}! {calories} kcal brûlées. L'objectif est proche!",
            "Génial, {name}! Presque là. Ne t'arrête pas!",
        ],
        Pool::MotivationVeryHigh => &[
            "PRESQUE RÉUSSI, {name}! {percent}% Le dernier effort!",
            "TU ES INCROYABLE, {name}! Seulement {remaining} kcal restantes. ALLEZ!",
            "LA VICTOIRE EST PROCHE, {name}! {percent}% TU PEUX LE FAIRE!",
        ],
        Pool::Progress => &[
            "Progrès actuel: {calories} kcal ({percent1}%). Continue, {name}!",
            "Tu as brûlé {calories} calories. C'est {percent1}% de ton objectif!",
            "{name}, tu as éliminé {calories} kcal. {percent1}% complété!",
        ],
        Pool::Nutrition => &[
            "Hydratation: Bois de l'eau pour récupérer. Tu as perdu beaucoup de liquide.",
            "Post-entraînement: Considère protéine + glucides dans les 30 prochaines min.",
            "Récupération: Une banane et des noix sont parfaites maintenant.",
            "Réhydratation: L'eau avec électrolytes aidera ta récupération.",
            "Protéine: Un shake protéiné optimisera ta récupération musculaire.",
            "Graisses saines: Avocat ou noix aident à la récupération.",
        ],
        Pool::Wellness => &[
            "{name}, le bonheur est dans les petites réussites quotidiennes. Célèbre chaque victoire.",
            "Chaque jour est une nouvelle opportunité, {name}. Profite du processus, pas seulement du résultat.",
            "Ta santé mentale est aussi importante que la physique. Repose-toi quand tu en as besoin.",
            "{name}, la constance bat la perfection. Petits pas chaque jour.",
            "L'équilibre est la clé: exercice, nutrition, repos et joie.",
            "{name}, chaque entraînement est un investissement dans ton futur. Continue!",
            "Définis des objectifs, mais profite du voyage. La vie est le voyage, pas la destination.",
            "Ton corps est ton temple, {name}. Prends-en soin avec amour et respect.",
        ],
        Pool::EncouragementHigh => &[
            "{name}! Tu as complété {percent}%. C'est incroyable! Demain sera encore mieux.",
            "{percent}% c'est EXCELLENT, {name}! Ton corps te remercie. Repose-toi bien.",
            "Quel effort, {name}! {percent}% atteint. Tu construis ta discipline.",
        ],
        Pool::EncouragementMid => &[
            "{name}, {percent}% est une vraie réussite. Chaque séance compte. Reviens vite!",
            "{percent}% complété, {name}! C'est du progrès. Demain est un autre jour.",
            "Bien joué, {name}! {percent}% vaut mieux que zéro. La constance est la clé.",
        ],
        Pool::EncouragementLow => &[
            "{name}, l'important c'est d'avoir essayé. Écoute ton corps. Reviens quand tu es prêt.",
            "Hé {name}! Même {percent}% est un pas en avant. Sans pression. Reviens en force.",
            "{name}! Ton bien-être d'abord. {percent}% vaut mieux que rien. À bientôt!",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOLS: [Pool; 10] = [
        Pool::MotivationLow,
        Pool::MotivationMid,
        Pool::MotivationHigh,
        Pool::MotivationVeryHigh,
        Pool::Progress,
        Pool::Nutrition,
        Pool::Wellness,
        Pool::EncouragementHigh,
        Pool::EncouragementMid,
        Pool::EncouragementLow,
    ];

    #[test]
    fn every_pool_has_alternatives() {
        for locale in Locale::ALL {
            for p in POOLS {
                assert!(pool(locale, p).len() >= 2, "{locale} {p:?}");
            }
        }
    }

    #[test]
    fn render_fills_placeholders() {
        let vars = TemplateVars {
            name: "Ana",
            percent: 42.36,
            calories: 120.4,
            ..Default::default()
        };
        assert_eq!(
            render("{name}: {calories} kcal, {percent}% / {percent1}%", &vars),
            "Ana: 120 kcal, 42% / 42.4%"
        );
    }

    #[test]
    fn no_placeholders_left_after_render() {
        let vars = TemplateVars {
            name: "Ana",
            food: "apple",
            ..Default::default()
        };
        for locale in Locale::ALL {
            for p in POOLS {
                for t in pool(locale, p) {
                    assert!(!render(t, &vars).contains('{'), "{t}");
                }
            }
        }
    }

    #[test]
    fn locale_parses_names() {
        assert_eq!("Français".parse::<Locale>().unwrap(), Locale::Fr);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("de".parse::<Locale>().is_err());
    }
}
