//! Generation functions: request, recover, normalize, or fall back.
//!
//! [`Generator::generate`] is the single orchestrator for every content kind.
//! It always resolves to a complete record; transport and recovery failures
//! are logged and converted into the kind's fallback record.

use crate::ai::{CompletionService, GeminiCompletionClient};
use crate::fallback;
use crate::models::{
    CareerGuidance, CareerParams, ChatParams, ChatReply, CompletionRequest, Config, ContentKind,
    DietParams, DietPlan, DomainRecord, FinancialHelp, FinancialParams, GenerationParams,
    InjuryAdvice, InjuryParams, NutritionAnalysis, NutritionParams, PlanParams,
    SymptomAssessment, SymptomParams, TrainingPlan, Workout, WorkoutParams,
};
use crate::normalize::{normalize_as, Normalize};
use crate::recovery::recover_json;
use crate::{prompts, Error, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Why a fallback record was returned instead of a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackReason {
    NoCredential,
    Transport,
    RecoveryFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordSource {
    Live,
    Fallback(FallbackReason),
}

/// A complete record plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated<R> {
    pub record: R,
    pub source: RecordSource,
}

impl<R> Generated<R> {
    fn live(record: R) -> Self {
        Self {
            record,
            source: RecordSource::Live,
        }
    }

    fn fallback(record: R, reason: FallbackReason) -> Self {
        Self {
            record,
            source: RecordSource::Fallback(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, RecordSource::Fallback(_))
    }

    pub fn map<T>(self, f: impl FnOnce(R) -> T) -> Generated<T> {
        Generated {
            record: f(self.record),
            source: self.source,
        }
    }
}

/// A record type the pipeline can generate.
pub trait ContentRecord: Normalize + Send {
    const KIND: ContentKind;
    type Params: Serialize + Send + Sync;

    fn fallback(params: &Self::Params) -> Self;

    fn into_domain(self) -> DomainRecord;

    fn request(params: &Self::Params) -> CompletionRequest {
        let payload = serde_json::to_string_pretty(params).unwrap_or_else(|_| "{}".to_string());
        CompletionRequest {
            system_instruction: prompts::system_instruction(Self::KIND),
            user_payload: prompts::render(prompts::USER_REQUEST, &[("params", payload.as_str())]),
            temperature: Self::KIND.temperature(),
            max_output_tokens: Self::KIND.max_output_tokens(),
        }
    }

    /// Turn completion text into a record, or report `RecoveryFailed`.
    fn parse(text: &str) -> Result<Self> {
        recover_json(text).map(normalize_as::<Self>)
    }
}

macro_rules! content_record {
    ($record:ty, $variant:ident, $params:ty, $fallback:path) => {
        impl ContentRecord for $record {
            const KIND: ContentKind = ContentKind::$variant;
            type Params = $params;

            fn fallback(params: &$params) -> Self {
                $fallback(params)
            }

            fn into_domain(self) -> DomainRecord {
                DomainRecord::$variant(self)
            }
        }
    };
}

content_record!(TrainingPlan, Plan, PlanParams, fallback::training_plan);
content_record!(Workout, Workout, WorkoutParams, fallback::workout);
content_record!(DietPlan, Diet, DietParams, fallback::diet_plan);
content_record!(CareerGuidance, Career, CareerParams, fallback::career_guidance);
content_record!(FinancialHelp, Financial, FinancialParams, fallback::financial_help);
content_record!(InjuryAdvice, Injury, InjuryParams, fallback::injury_advice);
content_record!(SymptomAssessment, Symptom, SymptomParams, fallback::symptom_assessment);
content_record!(NutritionAnalysis, Nutrition, NutritionParams, fallback::nutrition_analysis);

impl ContentRecord for ChatReply {
    const KIND: ContentKind = ContentKind::Chat;
    type Params = ChatParams;

    fn fallback(params: &ChatParams) -> Self {
        fallback::chat_reply(params)
    }

    fn into_domain(self) -> DomainRecord {
        DomainRecord::Chat(self)
    }

    fn request(params: &ChatParams) -> CompletionRequest {
        let context = params.context.as_deref().unwrap_or_default();
        CompletionRequest {
            system_instruction: prompts::system_instruction(ContentKind::Chat),
            user_payload: prompts::render(
                prompts::CHAT_USER,
                &[("context", context), ("message", params.message.as_str())],
            )
            .trim()
            .to_string(),
            temperature: ContentKind::Chat.temperature(),
            max_output_tokens: ContentKind::Chat.max_output_tokens(),
        }
    }

    /// Chat is prose: a JSON reply is used when present, otherwise the raw text.
    fn parse(text: &str) -> Result<Self> {
        if let Ok(value) = recover_json(text) {
            let reply: ChatReply = normalize_as(value);
            if !reply.reply.is_empty() {
                return Ok(reply);
            }
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::RecoveryFailed("empty chat completion".to_string()));
        }
        Ok(ChatReply {
            reply: trimmed.to_string(),
        })
    }
}

/// Entry point for every generation call.
///
/// Cheap to clone; concurrent calls share nothing but the completion service.
#[derive(Clone)]
pub struct Generator {
    completion: Option<Arc<dyn CompletionService>>,
}

impl Generator {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self {
            completion: Some(completion),
        }
    }

    /// A generator with no credential: every call returns its fallback record.
    pub fn offline() -> Self {
        Self { completion: None }
    }

    /// Gemini-backed when a credential is configured, offline otherwise.
    pub fn from_config(config: &Config, http_client: reqwest::Client) -> Self {
        match GeminiCompletionClient::from_config(config, http_client) {
            Some(client) => {
                info!("Generation provider: Gemini (model: {})", client.model());
                Self::new(Arc::new(client))
            }
            None => {
                warn!("GEMINI_API_KEY not set; all generation will use offline fallbacks");
                Self::offline()
            }
        }
    }

    pub fn has_credential(&self) -> bool {
        self.completion.is_some()
    }

    /// Run the full pipeline for one record type.
    pub async fn generate<R: ContentRecord>(&self, params: &R::Params) -> Generated<R> {
        let Some(completion) = &self.completion else {
            warn!("[{}] No credential configured; using fallback", R::KIND);
            return Generated::fallback(R::fallback(params), FallbackReason::NoCredential);
        };

        let request = R::request(params);
        let text = match completion.complete(&request).await {
            Ok(text) => text,
            Err(e) => {
                warn!("[{}] Completion failed: {}. Using fallback", R::KIND, e);
                return Generated::fallback(R::fallback(params), FallbackReason::Transport);
            }
        };

        match R::parse(&text) {
            Ok(record) => {
                info!("[{}] Generated live record", R::KIND);
                Generated::live(record)
            }
            Err(e) => {
                warn!("[{}] Could not recover completion: {}. Using fallback", R::KIND, e);
                Generated::fallback(R::fallback(params), FallbackReason::RecoveryFailed)
            }
        }
    }

    /// Dispatch on the parameter variant and return a tagged record.
    pub async fn generate_any(&self, params: &GenerationParams) -> Generated<DomainRecord> {
        match params {
            GenerationParams::Plan(p) => self.generate_domain::<TrainingPlan>(p).await,
            GenerationParams::Workout(p) => self.generate_domain::<Workout>(p).await,
            GenerationParams::Diet(p) => self.generate_domain::<DietPlan>(p).await,
            GenerationParams::Career(p) => self.generate_domain::<CareerGuidance>(p).await,
            GenerationParams::Financial(p) => self.generate_domain::<FinancialHelp>(p).await,
            GenerationParams::Injury(p) => self.generate_domain::<InjuryAdvice>(p).await,
            GenerationParams::Symptom(p) => self.generate_domain::<SymptomAssessment>(p).await,
            GenerationParams::Nutrition(p) => self.generate_domain::<NutritionAnalysis>(p).await,
            GenerationParams::Chat(p) => self.generate_domain::<ChatReply>(p).await,
        }
    }

    async fn generate_domain<R: ContentRecord>(
        &self,
        params: &R::Params,
    ) -> Generated<DomainRecord> {
        self.generate::<R>(params).await.map(R::into_domain)
    }

    pub async fn generate_training_plan(&self, params: &PlanParams) -> Generated<TrainingPlan> {
        self.generate(params).await
    }

    pub async fn generate_workout(&self, params: &WorkoutParams) -> Generated<Workout> {
        self.generate(params).await
    }

    pub async fn generate_diet_plan(&self, params: &DietParams) -> Generated<DietPlan> {
        self.generate(params).await
    }

    pub async fn generate_career_guidance(
        &self,
        params: &CareerParams,
    ) -> Generated<CareerGuidance> {
        self.generate(params).await
    }

    pub async fn generate_financial_help(
        &self,
        params: &FinancialParams,
    ) -> Generated<FinancialHelp> {
        self.generate(params).await
    }

    pub async fn assess_injury(&self, params: &InjuryParams) -> Generated<InjuryAdvice> {
        self.generate(params).await
    }

    pub async fn assess_symptoms(&self, params: &SymptomParams) -> Generated<SymptomAssessment> {
        self.generate(params).await
    }

    pub async fn analyze_nutrition(
        &self,
        params: &NutritionParams,
    ) -> Generated<NutritionAnalysis> {
        self.generate(params).await
    }

    pub async fn chat(&self, params: &ChatParams) -> Generated<ChatReply> {
        self.generate(params).await
    }
}
