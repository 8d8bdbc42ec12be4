//! Data models and structures
//!
//! Defines the completion request, the complete domain records handed to
//! callers, the per-kind parameter objects, and environment configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Tag identifying which record shape a generation call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Plan,
    Workout,
    Diet,
    Career,
    Financial,
    Injury,
    Symptom,
    Nutrition,
    Chat,
}

impl ContentKind {
    pub const ALL: [ContentKind; 9] = [
        ContentKind::Plan,
        ContentKind::Workout,
        ContentKind::Diet,
        ContentKind::Career,
        ContentKind::Financial,
        ContentKind::Injury,
        ContentKind::Symptom,
        ContentKind::Nutrition,
        ContentKind::Chat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Plan => "plan",
            ContentKind::Workout => "workout",
            ContentKind::Diet => "diet",
            ContentKind::Career => "career",
            ContentKind::Financial => "financial",
            ContentKind::Injury => "injury",
            ContentKind::Symptom => "symptom",
            ContentKind::Nutrition => "nutrition",
            ContentKind::Chat => "chat",
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            ContentKind::Plan | ContentKind::Workout | ContentKind::Diet => 0.7,
            ContentKind::Injury | ContentKind::Symptom => 0.3,
            ContentKind::Nutrition => 0.2,
            ContentKind::Career | ContentKind::Financial => 0.6,
            ContentKind::Chat => 0.8,
        }
    }

    pub fn max_output_tokens(&self) -> u32 {
        match self {
            ContentKind::Plan | ContentKind::Workout | ContentKind::Diet => 2048,
            ContentKind::Injury | ContentKind::Symptom | ContentKind::Nutrition => 1024,
            ContentKind::Career | ContentKind::Financial => 1536,
            ContentKind::Chat => 512,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-turn completion request, built fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub user_payload: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

// Domain records. Every field is always present once normalized.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub day: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    pub title: String,
    pub detail: String,
    pub status: String,
    pub schedule: Vec<ScheduleDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub description: String,
    pub adaptations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub title: String,
    /// Minutes.
    pub duration: u32,
    pub difficulty: String,
    pub focus_area: String,
    pub exercises: Vec<Exercise>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macros {
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    pub time: String,
    pub foods: Vec<String>,
    pub calories: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub title: String,
    pub daily_calories: u32,
    pub macros: Macros,
    pub meals: Vec<Meal>,
    pub hydration: String,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPath {
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerGuidance {
    pub summary: String,
    pub paths: Vec<CareerPath>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingOption {
    pub name: String,
    pub description: String,
    pub eligibility: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHelp {
    pub summary: String,
    pub funding_options: Vec<FundingOption>,
    pub budgeting_tips: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryAdvice {
    pub summary: String,
    pub risk_level: String,
    pub immediate_care: Vec<String>,
    pub recovery_steps: Vec<String>,
    pub prevention: Vec<String>,
    pub see_professional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Moderate,
    High,
    Emergency,
}

impl Urgency {
    /// Lenient parse; anything unrecognized maps to `Moderate`.
    pub fn from_loose(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "minor" | "mild" => Urgency::Low,
            "high" | "urgent" | "severe" => Urgency::High,
            "emergency" | "critical" => Urgency::Emergency,
            _ => Urgency::Moderate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAssessment {
    pub summary: String,
    pub possible_causes: Vec<String>,
    pub urgency: Urgency,
    pub recommendations: Vec<String>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionAnalysis {
    pub food: String,
    pub calories: u32,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
    pub highlights: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
}

/// Sum of every complete record shape, tagged by content kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "lowercase")]
pub enum DomainRecord {
    Plan(TrainingPlan),
    Workout(Workout),
    Diet(DietPlan),
    Career(CareerGuidance),
    Financial(FinancialHelp),
    Injury(InjuryAdvice),
    Symptom(SymptomAssessment),
    Nutrition(NutritionAnalysis),
    Chat(ChatReply),
}

impl DomainRecord {
    pub fn kind(&self) -> ContentKind {
        match self {
            DomainRecord::Plan(_) => ContentKind::Plan,
            DomainRecord::Workout(_) => ContentKind::Workout,
            DomainRecord::Diet(_) => ContentKind::Diet,
            DomainRecord::Career(_) => ContentKind::Career,
            DomainRecord::Financial(_) => ContentKind::Financial,
            DomainRecord::Injury(_) => ContentKind::Injury,
            DomainRecord::Symptom(_) => ContentKind::Symptom,
            DomainRecord::Nutrition(_) => ContentKind::Nutrition,
            DomainRecord::Chat(_) => ContentKind::Chat,
        }
    }
}

// Caller parameter objects, one per content kind.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanParams {
    pub sport: String,
    pub goal: String,
    pub weeks: u32,
    pub days_per_week: u32,
    pub injuries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutParams {
    pub sport: String,
    pub goal: String,
    pub duration_minutes: u32,
    pub difficulty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disability: Option<String>,
    pub equipment: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietParams {
    pub sport: String,
    pub goal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    pub restrictions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerParams {
    pub sport: String,
    pub level: String,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialParams {
    pub sport: String,
    pub situation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryParams {
    pub sport: String,
    pub body_part: String,
    pub description: String,
    /// Self-reported, 0 to 10.
    pub pain_level: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomParams {
    pub symptoms: Vec<String>,
    pub duration: String,
    pub sport: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionParams {
    pub food: String,
    pub portion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatParams {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Parameters for any kind; the variant determines the content kind.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationParams {
    Plan(PlanParams),
    Workout(WorkoutParams),
    Diet(DietParams),
    Career(CareerParams),
    Financial(FinancialParams),
    Injury(InjuryParams),
    Symptom(SymptomParams),
    Nutrition(NutritionParams),
    Chat(ChatParams),
}

impl GenerationParams {
    pub fn kind(&self) -> ContentKind {
        match self {
            GenerationParams::Plan(_) => ContentKind::Plan,
            GenerationParams::Workout(_) => ContentKind::Workout,
            GenerationParams::Diet(_) => ContentKind::Diet,
            GenerationParams::Career(_) => ContentKind::Career,
            GenerationParams::Financial(_) => ContentKind::Financial,
            GenerationParams::Injury(_) => ContentKind::Injury,
            GenerationParams::Symptom(_) => ContentKind::Symptom,
            GenerationParams::Nutrition(_) => ContentKind::Nutrition,
            GenerationParams::Chat(_) => ContentKind::Chat,
        }
    }
}

// Configuration
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BACKOFF_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` selects the offline fallback path for every generation.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub rate_limit_backoff: Duration,
    pub request_timeout: Duration,
    pub translation_cache_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limit_backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            translation_cache_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        load_dotenv(dotenvy::dotenv().map(|_| ()))?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(Self {
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            rate_limit_backoff: Duration::from_millis(parse_u64(
                &lookup,
                "RATE_LIMIT_BACKOFF_MS",
                DEFAULT_BACKOFF_MS,
            )?),
            request_timeout: Duration::from_secs(parse_u64(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            translation_cache_path: lookup("TRANSLATION_CACHE_PATH").map(PathBuf::from),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// A missing `.env` file is fine; an unreadable or malformed one is not.
fn load_dotenv(result: std::result::Result<(), dotenvy::Error>) -> crate::Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> crate::Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            crate::Error::Config(format!("{} must be an integer, got '{}'", key, raw))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults_without_credential() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(!config.has_credential());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.rate_limit_backoff, Duration::from_millis(1000));
        assert!(config.translation_cache_path.is_none());
    }

    #[test]
    fn test_config_blank_key_is_no_credential() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "   ")])).unwrap();
        assert!(!config.has_credential());
    }

    #[test]
    fn test_config_reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "abc"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("RATE_LIMIT_BACKOFF_MS", "250"),
            ("TRANSLATION_CACHE_PATH", "/tmp/cache.json"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.rate_limit_backoff, Duration::from_millis(250));
        assert_eq!(
            config.translation_cache_path,
            Some(PathBuf::from("/tmp/cache.json"))
        );
    }

    #[test]
    fn test_config_rejects_non_numeric_backoff() {
        let err = Config::from_lookup(lookup_from(&[("RATE_LIMIT_BACKOFF_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_missing_dotenv_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let result = dotenvy::from_path(dir.path().join(".env"));
        assert!(load_dotenv(result).is_ok());
    }

    #[test]
    fn test_malformed_dotenv_file_is_env_var_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "this line has no equals sign\n").unwrap();

        let err = load_dotenv(dotenvy::from_path(&path)).unwrap_err();
        assert!(matches!(err, crate::Error::EnvVar(_)));
    }

    #[test]
    fn test_workout_serializes_camel_case() {
        let workout = Workout {
            title: "Core".to_string(),
            duration: 30,
            difficulty: "easy".to_string(),
            focus_area: "core".to_string(),
            exercises: vec![],
            notes: vec![],
        };
        let json = serde_json::to_string(&workout).unwrap();
        assert!(json.contains("\"focusArea\":\"core\""));
    }

    #[test]
    fn test_urgency_from_loose() {
        assert_eq!(Urgency::from_loose("HIGH"), Urgency::High);
        assert_eq!(Urgency::from_loose(" critical "), Urgency::Emergency);
        assert_eq!(Urgency::from_loose("whatever"), Urgency::Moderate);
    }

    #[test]
    fn test_every_kind_has_generation_settings() {
        for kind in ContentKind::ALL {
            assert!(kind.max_output_tokens() > 0);
            assert!((0.0..=1.0).contains(&kind.temperature()));
        }
    }
}
