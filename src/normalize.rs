//! Schema normalization of recovered JSON into complete domain records.
//!
//! Each record has a `Partial*` input form whose fields are all optional raw
//! JSON values, read from the object by an ordered list of candidate keys
//! (the first non-null key wins). Building a partial form from any object
//! cannot fail, and a key the model repeats under a synonym never discards
//! the others. The `From` conversions into the complete records are total:
//! absent or malformed fields take fixed defaults, scalars are wrapped where a
//! list is required, and numbers are pulled out of strings such as
//! `"30 minutes"`.

use crate::models::{
    CareerGuidance, CareerPath, ChatReply, ContentKind, DietPlan, DomainRecord, Exercise,
    FinancialHelp, FundingOption, InjuryAdvice, Macros, Meal, NutritionAnalysis, ScheduleDay,
    SymptomAssessment, TrainingPlan, Urgency, Workout,
};
use serde_json::{Map, Value};

pub const MEDICAL_DISCLAIMER: &str = "This is general guidance, not a medical diagnosis. \
Consult a qualified healthcare professional about persistent or severe symptoms.";

/// A partial input form read field by field from a JSON object.
pub trait FromFields: Default {
    fn from_fields(fields: &Map<String, Value>) -> Self;
}

/// A complete record that can be produced from its partial input form.
pub trait Normalize: Sized {
    type Partial: FromFields + Into<Self>;
}

/// First non-null value among `keys`, in order.
fn pick(fields: &Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .find_map(|key| fields.get(*key).filter(|value| !value.is_null()))
        .cloned()
}

/// Declare a partial form; each field lists its candidate keys, preferred first.
macro_rules! partial_form {
    ($name:ident { $($field:ident: [$($key:literal),+ $(,)?]),+ $(,)? }) => {
        #[derive(Debug, Default)]
        pub struct $name {
            $(pub $field: Option<Value>,)+
        }

        impl FromFields for $name {
            fn from_fields(fields: &Map<String, Value>) -> Self {
                Self {
                    $($field: pick(fields, &[$($key),+]),)+
                }
            }
        }
    };
}

/// Normalize any JSON value into a complete record of type `R`.
pub fn normalize_as<R: Normalize>(value: Value) -> R {
    let partial = match root_object(value) {
        Some(map) => R::Partial::from_fields(&map),
        None => R::Partial::default(),
    };
    partial.into()
}

/// Normalize a recovered value for `kind`. Never fails.
pub fn normalize(kind: ContentKind, value: Value) -> DomainRecord {
    match kind {
        ContentKind::Plan => DomainRecord::Plan(normalize_as(value)),
        ContentKind::Workout => DomainRecord::Workout(normalize_as(value)),
        ContentKind::Diet => DomainRecord::Diet(normalize_as(value)),
        ContentKind::Career => DomainRecord::Career(normalize_as(value)),
        ContentKind::Financial => DomainRecord::Financial(normalize_as(value)),
        ContentKind::Injury => DomainRecord::Injury(normalize_as(value)),
        ContentKind::Symptom => DomainRecord::Symptom(normalize_as(value)),
        ContentKind::Nutrition => DomainRecord::Nutrition(normalize_as(value)),
        ContentKind::Chat => DomainRecord::Chat(normalize_as(value)),
    }
}

/// Objects pass through, arrays contribute their first object, bare strings
/// become `{"reply": ...}` so chat text survives. Anything else is empty.
fn root_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        Value::Array(items) => items.into_iter().find_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        }),
        Value::String(text) => {
            let mut map = Map::new();
            map.insert("reply".to_string(), Value::String(text));
            Some(map)
        }
        _ => None,
    }
}

// Field coercion helpers

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_to_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(map) => ["name", "title", "text", "description"]
            .iter()
            .find_map(|key| map.get(*key).and_then(value_to_text)),
        Value::Null => None,
    }
}

fn text(value: &Option<Value>, default: &str) -> String {
    value
        .as_ref()
        .and_then(value_to_text)
        .unwrap_or_else(|| default.to_string())
}

fn string_list(value: &Option<Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(value_to_text).collect(),
        Some(other) => value_to_text(other).into_iter().collect(),
    }
}

/// Leading number of a JSON number or a string like `"20g"` or `"45 min"`.
fn number(value: &Option<Value>) -> Option<f64> {
    let parsed = match value.as_ref()? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let prefix: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            prefix.parse().ok()
        }
        _ => None,
    };
    parsed.filter(|n: &f64| n.is_finite() && *n >= 0.0)
}

fn whole_number(value: &Option<Value>, default: u32) -> u32 {
    number(value)
        .map(|n| n.round().min(f64::from(u32::MAX)) as u32)
        .unwrap_or(default)
}

fn decimal(value: &Option<Value>, default: f64) -> f64 {
    number(value).unwrap_or(default)
}

fn flag(value: &Option<Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(default, |n| n != 0.0),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => true,
            "false" | "no" | "n" | "0" => false,
            _ => default,
        },
        _ => default,
    }
}

/// A list of partial objects. A lone object is wrapped; scalars go through
/// `from_scalar`; nulls are dropped.
fn object_list<P, F>(value: &Option<Value>, from_scalar: F) -> Vec<P>
where
    P: FromFields,
    F: Fn(String) -> P,
{
    let items: Vec<&Value> = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(P::from_fields(map)),
            Value::Null => None,
            other => value_to_text(other).map(&from_scalar),
        })
        .collect()
}

fn string_value(text: String) -> Option<Value> {
    Some(Value::String(text))
}

// Training plan

partial_form!(PartialTrainingPlan {
    title: ["title", "name"],
    detail: ["detail", "description"],
    status: ["status"],
    schedule: ["schedule", "days", "weeklySchedule"],
});

partial_form!(PartialScheduleDay {
    day: ["day", "dayName"],
    items: ["items", "activities", "sessions", "exercises"],
});

/// `{"Monday": [...], "Tuesday": [...]}` becomes a day list.
fn schedule_entries(schedule: &Option<Value>) -> Option<Value> {
    match schedule {
        Some(Value::Object(map)) if !map.contains_key("day") => Some(Value::Array(
            map.iter()
                .map(|(day, items)| serde_json::json!({ "day": day, "items": items }))
                .collect(),
        )),
        other => other.clone(),
    }
}

impl From<PartialTrainingPlan> for TrainingPlan {
    fn from(partial: PartialTrainingPlan) -> Self {
        let days: Vec<PartialScheduleDay> =
            object_list(&schedule_entries(&partial.schedule), |item| {
                PartialScheduleDay {
                    day: None,
                    items: string_value(item),
                }
            });

        Self {
            title: text(&partial.title, "Training Plan"),
            detail: text(&partial.detail, ""),
            status: text(&partial.status, "active"),
            schedule: days
                .into_iter()
                .enumerate()
                .map(|(i, day)| ScheduleDay {
                    day: text(&day.day, &format!("Day {}", i + 1)),
                    items: string_list(&day.items),
                })
                .collect(),
        }
    }
}

impl Normalize for TrainingPlan {
    type Partial = PartialTrainingPlan;
}

// Workout

partial_form!(PartialWorkout {
    title: ["title", "name"],
    duration: ["duration", "durationMinutes", "duration_minutes"],
    difficulty: ["difficulty", "level"],
    focus_area: ["focusArea", "focus_area", "focus"],
    exercises: ["exercises"],
    notes: ["notes", "tips"],
});

partial_form!(PartialExercise {
    name: ["name"],
    sets: ["sets"],
    reps: ["reps", "repetitions"],
    description: ["description", "instructions"],
    adaptations: ["adaptations", "modifications"],
});

impl From<PartialExercise> for Exercise {
    fn from(partial: PartialExercise) -> Self {
        Self {
            name: text(&partial.name, "Exercise"),
            sets: whole_number(&partial.sets, 3),
            reps: text(&partial.reps, "10"),
            description: text(&partial.description, ""),
            adaptations: string_list(&partial.adaptations),
        }
    }
}

impl From<PartialWorkout> for Workout {
    fn from(partial: PartialWorkout) -> Self {
        let exercises: Vec<PartialExercise> = object_list(&partial.exercises, |name| {
            PartialExercise {
                name: string_value(name),
                ..PartialExercise::default()
            }
        });

        Self {
            title: text(&partial.title, "Workout"),
            duration: whole_number(&partial.duration, 30),
            difficulty: text(&partial.difficulty, "moderate"),
            focus_area: text(&partial.focus_area, "full body"),
            exercises: exercises.into_iter().map(Exercise::from).collect(),
            notes: string_list(&partial.notes),
        }
    }
}

impl Normalize for Workout {
    type Partial = PartialWorkout;
}

// Diet

partial_form!(PartialDietPlan {
    title: ["title", "name"],
    daily_calories: ["dailyCalories", "calories", "daily_calories", "totalCalories"],
    macros: ["macros", "macronutrients"],
    meals: ["meals"],
    hydration: ["hydration", "water"],
    notes: ["notes", "tips"],
});

partial_form!(PartialMacros {
    protein_grams: ["proteinGrams", "protein", "protein_grams"],
    carbs_grams: ["carbsGrams", "carbs", "carbohydrates", "carbs_grams"],
    fat_grams: ["fatGrams", "fat", "fats", "fat_grams"],
});

partial_form!(PartialMeal {
    name: ["name", "meal"],
    time: ["time"],
    foods: ["foods", "items", "foodItems"],
    calories: ["calories"],
});

/// 30/45/25 protein/carb/fat split by energy.
pub fn balanced_macros(daily_calories: u32) -> Macros {
    let kcal = f64::from(daily_calories);
    Macros {
        protein_grams: (kcal * 0.30 / 4.0).round(),
        carbs_grams: (kcal * 0.45 / 4.0).round(),
        fat_grams: (kcal * 0.25 / 9.0).round(),
    }
}

impl From<PartialDietPlan> for DietPlan {
    fn from(partial: PartialDietPlan) -> Self {
        let daily_calories = whole_number(&partial.daily_calories, 2000);
        let balanced = balanced_macros(daily_calories);
        let macros = match &partial.macros {
            Some(Value::Object(map)) => {
                let raw = PartialMacros::from_fields(map);
                Macros {
                    protein_grams: decimal(&raw.protein_grams, balanced.protein_grams),
                    carbs_grams: decimal(&raw.carbs_grams, balanced.carbs_grams),
                    fat_grams: decimal(&raw.fat_grams, balanced.fat_grams),
                }
            }
            _ => balanced,
        };
        let meals: Vec<PartialMeal> = object_list(&partial.meals, |name| PartialMeal {
            name: string_value(name),
            ..PartialMeal::default()
        });

        Self {
            title: text(&partial.title, "Diet Plan"),
            daily_calories,
            macros,
            meals: meals
                .into_iter()
                .enumerate()
                .map(|(i, meal)| Meal {
                    name: text(&meal.name, &format!("Meal {}", i + 1)),
                    time: text(&meal.time, ""),
                    foods: string_list(&meal.foods),
                    calories: whole_number(&meal.calories, 0),
                })
                .collect(),
            hydration: text(&partial.hydration, "Drink water regularly throughout the day."),
            notes: string_list(&partial.notes),
        }
    }
}

impl Normalize for DietPlan {
    type Partial = PartialDietPlan;
}

// Career guidance

partial_form!(PartialCareerGuidance {
    summary: ["summary", "overview"],
    paths: ["paths", "careerPaths", "career_paths", "options"],
    resources: ["resources"],
});

partial_form!(PartialCareerPath {
    title: ["title", "name", "role"],
    description: ["description"],
    steps: ["steps", "nextSteps", "actions"],
});

impl From<PartialCareerGuidance> for CareerGuidance {
    fn from(partial: PartialCareerGuidance) -> Self {
        let paths: Vec<PartialCareerPath> = object_list(&partial.paths, |title| {
            PartialCareerPath {
                title: string_value(title),
                ..PartialCareerPath::default()
            }
        });

        Self {
            summary: text(&partial.summary, ""),
            paths: paths
                .into_iter()
                .map(|path| CareerPath {
                    title: text(&path.title, "Career path"),
                    description: text(&path.description, ""),
                    steps: string_list(&path.steps),
                })
                .collect(),
            resources: string_list(&partial.resources),
        }
    }
}

impl Normalize for CareerGuidance {
    type Partial = PartialCareerGuidance;
}

// Financial help

partial_form!(PartialFinancialHelp {
    summary: ["summary", "overview"],
    funding_options: ["fundingOptions", "funding", "funding_options", "grants"],
    budgeting_tips: ["budgetingTips", "budgeting", "budgeting_tips", "tips"],
    next_steps: ["nextSteps", "next_steps", "actions"],
});

partial_form!(PartialFundingOption {
    name: ["name", "title"],
    description: ["description"],
    eligibility: ["eligibility", "requirements"],
});

impl From<PartialFinancialHelp> for FinancialHelp {
    fn from(partial: PartialFinancialHelp) -> Self {
        let options: Vec<PartialFundingOption> = object_list(&partial.funding_options, |name| {
            PartialFundingOption {
                name: string_value(name),
                ..PartialFundingOption::default()
            }
        });

        Self {
            summary: text(&partial.summary, ""),
            funding_options: options
                .into_iter()
                .map(|option| FundingOption {
                    name: text(&option.name, "Funding option"),
                    description: text(&option.description, ""),
                    eligibility: text(&option.eligibility, ""),
                })
                .collect(),
            budgeting_tips: string_list(&partial.budgeting_tips),
            next_steps: string_list(&partial.next_steps),
        }
    }
}

impl Normalize for FinancialHelp {
    type Partial = PartialFinancialHelp;
}

// Injury advice

partial_form!(PartialInjuryAdvice {
    summary: ["summary", "assessment"],
    risk_level: ["riskLevel", "risk", "risk_level", "severity"],
    immediate_care: ["immediateCare", "immediate_care", "firstAid"],
    recovery_steps: ["recoverySteps", "recovery_steps", "recovery", "rehab"],
    prevention: ["prevention"],
    see_professional: ["seeProfessional", "see_professional", "seeDoctor"],
});

impl From<PartialInjuryAdvice> for InjuryAdvice {
    fn from(partial: PartialInjuryAdvice) -> Self {
        Self {
            summary: text(&partial.summary, ""),
            risk_level: text(&partial.risk_level, "moderate").to_ascii_lowercase(),
            immediate_care: string_list(&partial.immediate_care),
            recovery_steps: string_list(&partial.recovery_steps),
            prevention: string_list(&partial.prevention),
            see_professional: flag(&partial.see_professional, true),
        }
    }
}

impl Normalize for InjuryAdvice {
    type Partial = PartialInjuryAdvice;
}

// Symptom assessment

partial_form!(PartialSymptomAssessment {
    summary: ["summary", "assessment"],
    possible_causes: ["possibleCauses", "possible_causes", "causes"],
    urgency: ["urgency", "severity"],
    recommendations: ["recommendations", "advice", "nextSteps"],
    disclaimer: ["disclaimer"],
});

impl From<PartialSymptomAssessment> for SymptomAssessment {
    fn from(partial: PartialSymptomAssessment) -> Self {
        Self {
            summary: text(&partial.summary, ""),
            possible_causes: string_list(&partial.possible_causes),
            urgency: Urgency::from_loose(&text(&partial.urgency, "moderate")),
            recommendations: string_list(&partial.recommendations),
            disclaimer: text(&partial.disclaimer, MEDICAL_DISCLAIMER),
        }
    }
}

impl Normalize for SymptomAssessment {
    type Partial = PartialSymptomAssessment;
}

// Nutrition analysis

partial_form!(PartialNutritionAnalysis {
    food: ["food", "name", "item"],
    calories: ["calories", "kcal", "energy"],
    protein_grams: ["proteinGrams", "protein", "protein_grams"],
    carbs_grams: ["carbsGrams", "carbs", "carbohydrates", "carbs_grams"],
    fat_grams: ["fatGrams", "fat", "fats", "fat_grams"],
    highlights: ["highlights", "benefits"],
    recommendations: ["recommendations", "advice", "tips"],
});

impl From<PartialNutritionAnalysis> for NutritionAnalysis {
    fn from(partial: PartialNutritionAnalysis) -> Self {
        Self {
            food: text(&partial.food, "Unknown food"),
            calories: whole_number(&partial.calories, 0),
            protein_grams: decimal(&partial.protein_grams, 0.0),
            carbs_grams: decimal(&partial.carbs_grams, 0.0),
            fat_grams: decimal(&partial.fat_grams, 0.0),
            highlights: string_list(&partial.highlights),
            recommendations: string_list(&partial.recommendations),
        }
    }
}

impl Normalize for NutritionAnalysis {
    type Partial = PartialNutritionAnalysis;
}

// Chat

partial_form!(PartialChatReply {
    reply: ["reply", "response", "message", "text", "answer"],
});

impl From<PartialChatReply> for ChatReply {
    fn from(partial: PartialChatReply) -> Self {
        Self {
            reply: text(&partial.reply, ""),
        }
    }
}

impl Normalize for ChatReply {
    type Partial = PartialChatReply;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_object_yields_complete_record_for_every_kind() {
        for kind in ContentKind::ALL {
            let record = normalize(kind, json!({}));
            assert_eq!(record.kind(), kind);

            let serialized = serde_json::to_value(&record).unwrap();
            let fields = serialized["record"].as_object().unwrap();
            assert!(!fields.is_empty(), "{kind} has no fields");
            assert!(
                fields.values().all(|v| !v.is_null()),
                "{kind} has a null field"
            );
        }
    }

    #[test]
    fn test_scalar_items_wrapped_into_list() {
        let plan: TrainingPlan = normalize_as(json!({
            "title": "Base",
            "schedule": [
                { "day": "Mon", "items": "easy run" },
                { "day": "Tue", "items": ["swim", 3] }
            ]
        }));
        assert_eq!(plan.schedule[0].items, vec!["easy run".to_string()]);
        assert_eq!(plan.schedule[1].items, vec!["swim".to_string(), "3".to_string()]);
        assert_eq!(plan.status, "active");
    }

    #[test]
    fn test_plan_schedule_keyed_by_day() {
        let plan: TrainingPlan = normalize_as(json!({
            "schedule": { "Monday": ["intervals"], "Tuesday": "rest" }
        }));
        assert_eq!(
            plan.schedule,
            vec![
                ScheduleDay {
                    day: "Monday".to_string(),
                    items: vec!["intervals".to_string()]
                },
                ScheduleDay {
                    day: "Tuesday".to_string(),
                    items: vec!["rest".to_string()]
                },
            ]
        );
    }

    #[test]
    fn test_plan_days_without_names_are_numbered() {
        let plan: TrainingPlan = normalize_as(json!({ "schedule": ["run 5k", { "items": [] }] }));
        assert_eq!(plan.schedule[0].day, "Day 1");
        assert_eq!(plan.schedule[0].items, vec!["run 5k".to_string()]);
        assert_eq!(plan.schedule[1].day, "Day 2");
    }

    #[test]
    fn test_workout_coerces_numbers_and_exercise_strings() {
        let workout: Workout = normalize_as(json!({
            "title": "Seated strength",
            "duration": "45 minutes",
            "focusArea": "upper body",
            "exercises": [
                "Seated press",
                { "name": "Band row", "sets": "4", "reps": 12, "adaptations": "use a lighter band" }
            ],
            "notes": "hydrate"
        }));
        assert_eq!(workout.duration, 45);
        assert_eq!(workout.focus_area, "upper body");
        assert_eq!(workout.exercises.len(), 2);
        assert_eq!(workout.exercises[0].name, "Seated press");
        assert_eq!(workout.exercises[0].sets, 3);
        assert_eq!(workout.exercises[1].sets, 4);
        assert_eq!(workout.exercises[1].reps, "12");
        assert_eq!(
            workout.exercises[1].adaptations,
            vec!["use a lighter band".to_string()]
        );
        assert_eq!(workout.notes, vec!["hydrate".to_string()]);
    }

    #[test]
    fn test_workout_accepts_snake_case_focus_area() {
        let workout: Workout = normalize_as(json!({ "focus_area": "legs" }));
        assert_eq!(workout.focus_area, "legs");
    }

    #[test]
    fn test_diet_macros_default_from_calories() {
        let diet: DietPlan = normalize_as(json!({ "dailyCalories": 2400, "macros": "balanced" }));
        assert_eq!(diet.macros, balanced_macros(2400));
        assert_eq!(diet.macros.protein_grams, 180.0);
    }

    #[test]
    fn test_diet_partial_macros_keep_given_values() {
        let diet: DietPlan = normalize_as(json!({
            "calories": "1800 kcal",
            "macros": { "protein": "150g" },
            "meals": [{ "name": "Breakfast", "foods": "oats", "calories": 400 }, "Snack"]
        }));
        assert_eq!(diet.daily_calories, 1800);
        assert_eq!(diet.macros.protein_grams, 150.0);
        assert_eq!(diet.macros.fat_grams, balanced_macros(1800).fat_grams);
        assert_eq!(diet.meals[0].foods, vec!["oats".to_string()]);
        assert_eq!(diet.meals[1].name, "Snack");
    }

    #[test]
    fn test_symptom_urgency_and_disclaimer() {
        let assessment: SymptomAssessment = normalize_as(json!({ "urgency": "URGENT" }));
        assert_eq!(assessment.urgency, Urgency::High);
        assert_eq!(assessment.disclaimer, MEDICAL_DISCLAIMER);
    }

    #[test]
    fn test_injury_flag_from_string() {
        let advice: InjuryAdvice =
            normalize_as(json!({ "riskLevel": "LOW", "seeProfessional": "no" }));
        assert_eq!(advice.risk_level, "low");
        assert!(!advice.see_professional);
    }

    #[test]
    fn test_nutrition_reads_unit_suffixed_numbers() {
        let analysis: NutritionAnalysis = normalize_as(json!({
            "food": "banana", "calories": 105, "protein": "1.3g", "carbs": "27 g", "fat": null
        }));
        assert_eq!(analysis.calories, 105);
        assert_eq!(analysis.protein_grams, 1.3);
        assert_eq!(analysis.carbs_grams, 27.0);
        assert_eq!(analysis.fat_grams, 0.0);
    }

    #[test]
    fn test_career_and_financial_wrap_scalars() {
        let career: CareerGuidance =
            normalize_as(json!({ "paths": "Coaching", "resources": "local club" }));
        assert_eq!(career.paths[0].title, "Coaching");
        assert_eq!(career.resources, vec!["local club".to_string()]);

        let money: FinancialHelp =
            normalize_as(json!({ "fundingOptions": { "name": "Para grant" } }));
        assert_eq!(money.funding_options[0].name, "Para grant");
    }

    #[test]
    fn test_non_object_roots() {
        let chat = normalize(ContentKind::Chat, json!("Keep going!"));
        assert_eq!(
            chat,
            DomainRecord::Chat(ChatReply {
                reply: "Keep going!".to_string()
            })
        );

        let plan: TrainingPlan = normalize_as(json!([{ "title": "From array" }]));
        assert_eq!(plan.title, "From array");

        let workout: Workout = normalize_as(json!(42));
        assert_eq!(workout.title, "Workout");
    }

    #[test]
    fn test_exercise_with_field_and_synonym_keeps_content() {
        let workout: Workout = normalize_as(json!({
            "exercises": [{
                "name": "Band row",
                "sets": 4,
                "description": "Pull",
                "instructions": "Slowly"
            }]
        }));
        assert_eq!(
            workout.exercises,
            vec![Exercise {
                name: "Band row".to_string(),
                sets: 4,
                reps: "10".to_string(),
                description: "Pull".to_string(),
                adaptations: vec![],
            }]
        );
    }

    #[test]
    fn test_injury_with_conflicting_risk_keys_keeps_content() {
        let advice: InjuryAdvice = normalize_as(json!({
            "summary": "Likely a mild strain",
            "riskLevel": "low",
            "severity": "mild",
            "recoverySteps": ["ice", "rest"]
        }));
        assert_eq!(advice.summary, "Likely a mild strain");
        assert_eq!(advice.risk_level, "low");
        assert_eq!(advice.recovery_steps, vec!["ice".to_string(), "rest".to_string()]);
    }

    #[test]
    fn test_synonym_used_when_preferred_key_is_null() {
        let assessment: SymptomAssessment = normalize_as(json!({
            "urgency": null,
            "severity": "emergency",
            "recommendations": ["call 911"],
            "advice": ["ignored"]
        }));
        assert_eq!(assessment.urgency, Urgency::Emergency);
        assert_eq!(assessment.recommendations, vec!["call 911".to_string()]);
    }

    #[test]
    fn test_repeated_keys_across_every_level_of_a_diet() {
        let diet: DietPlan = normalize_as(json!({
            "title": "Cut",
            "name": "ignored",
            "dailyCalories": 2200,
            "calories": 1500,
            "macros": { "proteinGrams": 160, "protein": 90 },
            "meals": [{ "name": "Lunch", "meal": "ignored", "foods": ["rice"], "items": ["bread"] }]
        }));
        assert_eq!(diet.title, "Cut");
        assert_eq!(diet.daily_calories, 2200);
        assert_eq!(diet.macros.protein_grams, 160.0);
        assert_eq!(diet.meals[0].name, "Lunch");
        assert_eq!(diet.meals[0].foods, vec!["rice".to_string()]);
    }

    #[test]
    fn test_chat_reply_aliases() {
        let reply: ChatReply = normalize_as(json!({ "message": "Rest today." }));
        assert_eq!(reply.reply, "Rest today.");
    }
}
