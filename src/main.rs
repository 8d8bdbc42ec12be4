use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coachlink_generator::ai::{CompletionService, GeminiCompletionClient};
use coachlink_generator::models::{
    CareerParams, ChatParams, Config, DietParams, FinancialParams, GenerationParams,
    InjuryParams, NutritionParams, PlanParams, SymptomParams, WorkoutParams,
};
use coachlink_generator::translation::{TranslationCache, Translator};
use coachlink_generator::Generator;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "coachlink-generator")]
#[command(about = "Generate coaching content and print it as JSON")]
struct CliArgs {
    /// Skip the model entirely and print the offline fallback record.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Multi-week training plan
    Plan {
        #[arg(long)]
        sport: String,
        #[arg(long, default_value = "general fitness")]
        goal: String,
        #[arg(long, default_value_t = 4)]
        weeks: u32,
        #[arg(long, default_value_t = 4)]
        days_per_week: u32,
        #[arg(long = "injury")]
        injuries: Vec<String>,
    },
    /// Single workout session
    Workout {
        #[arg(long)]
        sport: String,
        #[arg(long, default_value = "general fitness")]
        goal: String,
        #[arg(long, default_value_t = 45)]
        duration_minutes: u32,
        #[arg(long, default_value = "moderate")]
        difficulty: String,
        #[arg(long)]
        disability: Option<String>,
        #[arg(long)]
        equipment: Vec<String>,
    },
    /// Daily diet plan
    Diet {
        #[arg(long)]
        sport: String,
        #[arg(long, default_value = "maintain")]
        goal: String,
        #[arg(long)]
        weight_kg: Option<f64>,
        #[arg(long = "restriction")]
        restrictions: Vec<String>,
    },
    /// Career guidance
    Career {
        #[arg(long)]
        sport: String,
        #[arg(long, default_value = "amateur")]
        level: String,
        #[arg(long = "interest")]
        interests: Vec<String>,
    },
    /// Funding and budgeting help
    Financial {
        #[arg(long)]
        sport: String,
        #[arg(long)]
        situation: String,
        #[arg(long)]
        country: Option<String>,
    },
    /// Injury assessment
    Injury {
        #[arg(long)]
        sport: String,
        #[arg(long)]
        body_part: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(0..=10))]
        pain_level: u8,
    },
    /// Symptom assessment
    Symptom {
        #[arg(long = "symptom", required = true)]
        symptoms: Vec<String>,
        #[arg(long, default_value = "")]
        duration: String,
        #[arg(long, default_value = "")]
        sport: String,
    },
    /// Nutrition facts for a food
    Nutrition {
        #[arg(long)]
        food: String,
        #[arg(long, default_value = "1 serving")]
        portion: String,
    },
    /// Free-form coaching chat
    Chat {
        message: String,
        #[arg(long)]
        context: Option<String>,
    },
    /// Translate text with the translation cache
    Translate {
        text: String,
        #[arg(long)]
        language: String,
    },
}

impl Command {
    fn into_params(self) -> Option<GenerationParams> {
        let params = match self {
            Command::Plan {
                sport,
                goal,
                weeks,
                days_per_week,
                injuries,
            } => GenerationParams::Plan(PlanParams {
                sport,
                goal,
                weeks,
                days_per_week,
                injuries,
            }),
            Command::Workout {
                sport,
                goal,
                duration_minutes,
                difficulty,
                disability,
                equipment,
            } => GenerationParams::Workout(WorkoutParams {
                sport,
                goal,
                duration_minutes,
                difficulty,
                disability,
                equipment,
            }),
            Command::Diet {
                sport,
                goal,
                weight_kg,
                restrictions,
            } => GenerationParams::Diet(DietParams {
                sport,
                goal,
                weight_kg,
                restrictions,
            }),
            Command::Career {
                sport,
                level,
                interests,
            } => GenerationParams::Career(CareerParams {
                sport,
                level,
                interests,
            }),
            Command::Financial {
                sport,
                situation,
                country,
            } => GenerationParams::Financial(FinancialParams {
                sport,
                situation,
                country,
            }),
            Command::Injury {
                sport,
                body_part,
                description,
                pain_level,
            } => GenerationParams::Injury(InjuryParams {
                sport,
                body_part,
                description,
                pain_level,
            }),
            Command::Symptom {
                symptoms,
                duration,
                sport,
            } => GenerationParams::Symptom(SymptomParams {
                symptoms,
                duration,
                sport,
            }),
            Command::Nutrition { food, portion } => {
                GenerationParams::Nutrition(NutritionParams { food, portion })
            }
            Command::Chat { message, context } => {
                GenerationParams::Chat(ChatParams { message, context })
            }
            Command::Translate { .. } => return None,
        };
        Some(params)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coachlink_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if args.offline {
        config.api_key = None;
    }

    let http_client = reqwest::Client::new();

    if let Command::Translate { text, language } = &args.command {
        let completion = GeminiCompletionClient::from_config(&config, http_client)
            .map(|client| Arc::new(client) as Arc<dyn CompletionService>);
        let cache = TranslationCache::from_config(&config)
            .await
            .context("Failed to open translation cache")?;
        let translator = Translator::new(completion, cache);

        println!("{}", translator.translate(text, language).await);
        translator
            .flush()
            .await
            .context("Failed to write translation cache")?;
        return Ok(());
    }

    let Some(params) = args.command.into_params() else {
        return Ok(());
    };

    info!("Generating {} content", params.kind());
    let generator = Generator::from_config(&config, http_client);
    let generated = generator.generate_any(&params).await;

    println!("{}", serde_json::to_string_pretty(&generated)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_plan_with_defaults() {
        let args = CliArgs::try_parse_from(["coachlink-generator", "plan", "--sport", "Rowing"])
            .unwrap();
        assert!(!args.offline);

        match args.command.into_params() {
            Some(GenerationParams::Plan(params)) => {
                assert_eq!(params.sport, "Rowing");
                assert_eq!(params.weeks, 4);
                assert!(params.injuries.is_empty());
            }
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn test_cli_offline_flag_is_global() {
        let args = CliArgs::try_parse_from([
            "coachlink-generator",
            "chat",
            "How do I taper?",
            "--offline",
        ])
        .unwrap();
        assert!(args.offline);
    }

    #[test]
    fn test_cli_rejects_out_of_range_pain_level() {
        let result = CliArgs::try_parse_from([
            "coachlink-generator",
            "injury",
            "--sport",
            "Football",
            "--body-part",
            "knee",
            "--pain-level",
            "11",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_translate_has_no_generation_params() {
        let args = CliArgs::try_parse_from([
            "coachlink-generator",
            "translate",
            "Rest well",
            "--language",
            "es",
        ])
        .unwrap();
        assert!(args.command.into_params().is_none());
    }
}
