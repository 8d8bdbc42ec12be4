//! Offline fallback records.
//!
//! Every function here is pure and deterministic in its parameters. The
//! records are generic but usable, and returned whenever the live pipeline
//! cannot produce a result.

use crate::models::{
    CareerGuidance, CareerParams, CareerPath, ChatParams, ChatReply, DietParams, DietPlan,
    DomainRecord, Exercise, FinancialHelp, FinancialParams, FundingOption, GenerationParams,
    InjuryAdvice, InjuryParams, Meal, NutritionAnalysis, NutritionParams, PlanParams,
    ScheduleDay, SymptomAssessment, SymptomParams, TrainingPlan, Urgency, Workout,
    WorkoutParams,
};
use crate::normalize::{balanced_macros, MEDICAL_DISCLAIMER};

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Order in which weekdays become training days as frequency rises.
const TRAINING_DAY_PRIORITY: [usize; 7] = [0, 2, 4, 5, 1, 3, 6];

const EMERGENCY_SIGNS: [&str; 6] = [
    "chest pain",
    "breath",
    "faint",
    "unconscious",
    "numb",
    "confus",
];

/// Fallback record for whichever kind `params` targets.
pub fn fallback(params: &GenerationParams) -> DomainRecord {
    match params {
        GenerationParams::Plan(p) => DomainRecord::Plan(training_plan(p)),
        GenerationParams::Workout(p) => DomainRecord::Workout(workout(p)),
        GenerationParams::Diet(p) => DomainRecord::Diet(diet_plan(p)),
        GenerationParams::Career(p) => DomainRecord::Career(career_guidance(p)),
        GenerationParams::Financial(p) => DomainRecord::Financial(financial_help(p)),
        GenerationParams::Injury(p) => DomainRecord::Injury(injury_advice(p)),
        GenerationParams::Symptom(p) => DomainRecord::Symptom(symptom_assessment(p)),
        GenerationParams::Nutrition(p) => DomainRecord::Nutrition(nutrition_analysis(p)),
        GenerationParams::Chat(p) => DomainRecord::Chat(chat_reply(p)),
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A 7-day weekly template with `days_per_week` training days.
pub fn training_plan(params: &PlanParams) -> TrainingPlan {
    let sport = or_default(&params.sport, "general fitness");
    let goal = or_default(&params.goal, "build a consistent routine");
    let weeks = params.weeks.max(1);
    let training_days = params.days_per_week.clamp(1, 7) as usize;

    let mut is_training = [false; 7];
    for &day in TRAINING_DAY_PRIORITY.iter().take(training_days) {
        is_training[day] = true;
    }

    let sessions = [
        vec![
            "Warm-up: 10 minutes easy movement".to_string(),
            format!("{sport} technique session: 30 minutes"),
            "Cool-down and stretching: 10 minutes".to_string(),
        ],
        vec![
            "Warm-up: 10 minutes".to_string(),
            "Strength circuit: 3 rounds of squats, push-ups, rows".to_string(),
            "Core stability: 10 minutes".to_string(),
        ],
        vec![
            "Warm-up: 10 minutes".to_string(),
            "Steady endurance work: 30-40 minutes at conversational pace".to_string(),
            "Mobility: 10 minutes".to_string(),
        ],
    ];

    let mut session_index = 0;
    let schedule = WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let items = if is_training[i] {
                let items = sessions[session_index % sessions.len()].clone();
                session_index += 1;
                items
            } else {
                strings(&["Rest and recovery", "Optional light mobility: 10 minutes"])
            };
            ScheduleDay {
                day: day.to_string(),
                items,
            }
        })
        .collect();

    let mut detail = format!(
        "A {weeks}-week {sport} plan with {training_days} training days per week to {goal}. \
Repeat this week, adding about 10% volume each week if you feel well."
    );
    if !params.injuries.is_empty() {
        detail.push_str(&format!(
            " Work around: {}. Stop any exercise that causes pain.",
            params.injuries.join(", ")
        ));
    }

    TrainingPlan {
        title: format!("{weeks}-Week {sport} Plan"),
        detail,
        status: "active".to_string(),
        schedule,
    }
}

fn with_adaptation(disability: Option<&str>, standard: &[&str]) -> Vec<String> {
    let mut list = strings(standard);
    if let Some(disability) = disability.map(str::trim).filter(|d| !d.is_empty()) {
        list.insert(
            0,
            format!("Adapt range and position to suit {disability}; seated versions are fine"),
        );
    }
    list
}

/// Four-exercise full-body session, with adaptations per exercise.
pub fn workout(params: &WorkoutParams) -> Workout {
    let difficulty = or_default(&params.difficulty, "beginner");
    let duration = if params.duration_minutes == 0 {
        30
    } else {
        params.duration_minutes
    };
    let (sets, reps) = match difficulty.to_ascii_lowercase().as_str() {
        "advanced" | "hard" => (4, "12-15"),
        "intermediate" | "moderate" => (3, "10-12"),
        _ => (2, "8-10"),
    };

    let disability = params.disability.as_deref();

    let exercises = vec![
        Exercise {
            name: "Squat to chair".to_string(),
            sets,
            reps: reps.to_string(),
            description: "Lower slowly until you touch the chair, then stand back up.".to_string(),
            adaptations: with_adaptation(
                disability,
                &["Seated leg extensions", "Hold a support rail"],
            ),
        },
        Exercise {
            name: "Wall push-up".to_string(),
            sets,
            reps: reps.to_string(),
            description: "Hands on the wall at shoulder height, bend and straighten the arms."
                .to_string(),
            adaptations: with_adaptation(disability, &["Seated chest press with a band"]),
        },
        Exercise {
            name: "Band row".to_string(),
            sets,
            reps: reps.to_string(),
            description: "Pull the band toward your ribs, squeezing the shoulder blades."
                .to_string(),
            adaptations: with_adaptation(disability, &["Single-arm rows", "Use a lighter band"]),
        },
        Exercise {
            name: "Plank hold".to_string(),
            sets,
            reps: "20-30 seconds".to_string(),
            description: "Keep a straight line from head to heels and breathe steadily."
                .to_string(),
            adaptations: with_adaptation(disability, &["Kneeling plank", "Seated core bracing"]),
        },
    ];

    let mut notes = strings(&[
        "Warm up for 5 minutes before starting.",
        "Rest 60-90 seconds between sets.",
    ]);
    if !params.equipment.is_empty() {
        notes.push(format!(
            "Available equipment: {}.",
            params.equipment.join(", ")
        ));
    }

    Workout {
        title: format!("{} Full-Body Session", or_default(&params.sport, "General")),
        duration,
        difficulty: difficulty.to_string(),
        focus_area: "full body".to_string(),
        exercises,
        notes,
    }
}

/// Sample macro-balanced day of eating.
pub fn diet_plan(params: &DietParams) -> DietPlan {
    let base = params
        .weight_kg
        .filter(|w| w.is_finite() && *w > 0.0)
        .map_or(2000.0, |w| w * 30.0);
    let goal = params.goal.to_ascii_lowercase();
    let adjusted = if goal.contains("lose") || goal.contains("cut") {
        base - 300.0
    } else if goal.contains("gain") || goal.contains("muscle") || goal.contains("bulk") {
        base + 300.0
    } else {
        base
    };
    let daily_calories = ((adjusted / 50.0).round() * 50.0).max(1200.0) as u32;

    let plant_based = params.restrictions.iter().any(|r| {
        let r = r.to_ascii_lowercase();
        r.contains("vegan") || r.contains("vegetarian")
    });
    let protein = if plant_based { "tofu" } else { "grilled chicken" };
    let snack_protein = if plant_based { "soy yogurt" } else { "Greek yogurt" };

    let share = |fraction: f64| (f64::from(daily_calories) * fraction).round() as u32;
    let meals = vec![
        Meal {
            name: "Breakfast".to_string(),
            time: "07:30".to_string(),
            foods: strings(&["Oats", "Berries", "Nuts"]),
            calories: share(0.25),
        },
        Meal {
            name: "Lunch".to_string(),
            time: "12:30".to_string(),
            foods: vec![
                "Brown rice".to_string(),
                protein.to_string(),
                "Mixed vegetables".to_string(),
            ],
            calories: share(0.35),
        },
        Meal {
            name: "Dinner".to_string(),
            time: "19:00".to_string(),
            foods: vec![
                "Whole-grain pasta".to_string(),
                protein.to_string(),
                "Salad with olive oil".to_string(),
            ],
            calories: share(0.30),
        },
        Meal {
            name: "Snack".to_string(),
            time: "16:00".to_string(),
            foods: vec![snack_protein.to_string(), "Fruit".to_string()],
            calories: share(0.10),
        },
    ];

    let mut notes = strings(&["Adjust portions to hunger and training load."]);
    if !params.restrictions.is_empty() {
        notes.push(format!(
            "Respect restrictions: {}.",
            params.restrictions.join(", ")
        ));
    }

    DietPlan {
        title: format!("Balanced {} Diet", or_default(&params.sport, "Athlete")),
        daily_calories,
        macros: balanced_macros(daily_calories),
        meals,
        hydration: "Aim for 2-3 litres of water a day, more on training days.".to_string(),
        notes,
    }
}

pub fn career_guidance(params: &CareerParams) -> CareerGuidance {
    let sport = or_default(&params.sport, "sport");
    let mut paths = vec![
        CareerPath {
            title: format!("{sport} coach"),
            description: "Pass on your experience to the next generation of athletes."
                .to_string(),
            steps: strings(&[
                "Earn an entry-level coaching certificate",
                "Volunteer with a local club",
                "Build a portfolio of sessions you have led",
            ]),
        },
        CareerPath {
            title: "Sports science or physiotherapy".to_string(),
            description: "Support athletes' performance and recovery.".to_string(),
            steps: strings(&[
                "Research accredited degree programmes",
                "Shadow a practitioner",
            ]),
        },
        CareerPath {
            title: "Sports administration and advocacy".to_string(),
            description: "Shape inclusive programmes from inside clubs and federations."
                .to_string(),
            steps: strings(&[
                "Join a club committee",
                "Take a sports management course",
            ]),
        },
    ];
    for interest in &params.interests {
        let interest = interest.trim();
        if !interest.is_empty() {
            paths.push(CareerPath {
                title: format!("{interest} in {sport}"),
                description: format!("Combine your interest in {interest} with {sport}."),
                steps: strings(&["Talk to people already working in this area"]),
            });
        }
    }

    CareerGuidance {
        summary: format!(
            "Career options for a {} {sport} athlete.",
            or_default(&params.level, "developing")
        ),
        paths,
        resources: strings(&[
            "Your national sports federation's education pathway",
            "Athlete career transition programmes",
        ]),
    }
}

pub fn financial_help(params: &FinancialParams) -> FinancialHelp {
    let sport = or_default(&params.sport, "sport");
    let region = params
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map_or_else(|| "your country".to_string(), str::to_string);

    FinancialHelp {
        summary: format!("Funding routes for {sport} athletes in {region}."),
        funding_options: vec![
            FundingOption {
                name: "Federation athlete grants".to_string(),
                description: format!("Performance grants from the national {sport} federation."),
                eligibility: "Usually based on ranking or selection".to_string(),
            },
            FundingOption {
                name: "Para-sport support programmes".to_string(),
                description: "Equipment and travel support for athletes with disabilities."
                    .to_string(),
                eligibility: "Classification by a recognised body".to_string(),
            },
            FundingOption {
                name: "Local sponsorship".to_string(),
                description: "Businesses in your community backing a local athlete.".to_string(),
                eligibility: "A short pitch and a clear budget".to_string(),
            },
        ],
        budgeting_tips: strings(&[
            "List fixed yearly costs: fees, equipment, travel",
            "Keep a buffer for unexpected competition costs",
        ]),
        next_steps: strings(&[
            "Contact your federation's athlete services",
            "Prepare a one-page sponsorship proposal",
        ]),
    }
}

pub fn injury_advice(params: &InjuryParams) -> InjuryAdvice {
    let body_part = or_default(&params.body_part, "the affected area");
    let risk_level = match params.pain_level {
        7.. => "high",
        4..=6 => "moderate",
        _ => "low",
    };

    InjuryAdvice {
        summary: format!(
            "Reported {body_part} discomfort (pain {}/10). Reduce load until it settles.",
            params.pain_level.min(10)
        ),
        risk_level: risk_level.to_string(),
        immediate_care: strings(&[
            "Rest from aggravating activity",
            "Ice for 15-20 minutes every few hours",
            "Gentle compression and elevation",
        ]),
        recovery_steps: strings(&[
            "Reintroduce pain-free range of motion",
            "Build back load gradually over 1-2 weeks",
        ]),
        prevention: strings(&[
            "Warm up thoroughly",
            "Increase training volume by no more than 10% per week",
        ]),
        see_professional: params.pain_level >= 5,
    }
}

pub fn symptom_assessment(params: &SymptomParams) -> SymptomAssessment {
    let emergency = params.symptoms.iter().any(|s| {
        let s = s.to_ascii_lowercase();
        EMERGENCY_SIGNS.iter().any(|sign| s.contains(sign))
    });

    let (urgency, recommendations) = if emergency {
        (
            Urgency::Emergency,
            strings(&["Stop activity and contact emergency services now"]),
        )
    } else {
        (
            Urgency::Moderate,
            strings(&[
                "Rest and monitor your symptoms",
                "See a healthcare professional if symptoms persist or worsen",
            ]),
        )
    };

    let listed = if params.symptoms.is_empty() {
        "your symptoms".to_string()
    } else {
        params.symptoms.join(", ")
    };

    SymptomAssessment {
        summary: format!(
            "Automated assessment unavailable. You reported: {listed} ({}).",
            or_default(&params.duration, "duration not given")
        ),
        possible_causes: Vec::new(),
        urgency,
        recommendations,
        disclaimer: MEDICAL_DISCLAIMER.to_string(),
    }
}

pub fn nutrition_analysis(params: &NutritionParams) -> NutritionAnalysis {
    NutritionAnalysis {
        food: or_default(&params.food, "Unknown food").to_string(),
        calories: 0,
        protein_grams: 0.0,
        carbs_grams: 0.0,
        fat_grams: 0.0,
        highlights: strings(&["Nutrition data is unavailable right now."]),
        recommendations: strings(&["Check the product label or try again later."]),
    }
}

pub fn chat_reply(params: &ChatParams) -> ChatReply {
    let reply = if params.message.trim().is_empty() {
        "I'm here to help with training, recovery and nutrition. What would you like to know?"
            .to_string()
    } else {
        "I can't reach the coaching assistant right now. Please try again in a moment, \
or message your coach directly."
            .to_string()
    };
    ChatReply { reply }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentKind;
    use pretty_assertions::assert_eq;

    fn plan_params(days_per_week: u32) -> PlanParams {
        PlanParams {
            sport: "Wheelchair basketball".to_string(),
            goal: "improve endurance".to_string(),
            weeks: 6,
            days_per_week,
            injuries: vec!["left shoulder".to_string()],
        }
    }

    fn all_params() -> Vec<GenerationParams> {
        vec![
            GenerationParams::Plan(plan_params(4)),
            GenerationParams::Workout(WorkoutParams {
                disability: Some("limited grip strength".to_string()),
                ..WorkoutParams::default()
            }),
            GenerationParams::Diet(DietParams {
                weight_kg: Some(70.0),
                ..DietParams::default()
            }),
            GenerationParams::Career(CareerParams::default()),
            GenerationParams::Financial(FinancialParams::default()),
            GenerationParams::Injury(InjuryParams::default()),
            GenerationParams::Symptom(SymptomParams::default()),
            GenerationParams::Nutrition(NutritionParams::default()),
            GenerationParams::Chat(ChatParams::default()),
        ]
    }

    #[test]
    fn test_fallback_is_deterministic_and_matches_kind() {
        for params in all_params() {
            let first = fallback(&params);
            let second = fallback(&params);
            assert_eq!(first, second);
            assert_eq!(first.kind(), params.kind());
        }
        assert_eq!(all_params().len(), ContentKind::ALL.len());
    }

    #[test]
    fn test_plan_is_weekly_template_with_requested_training_days() {
        let plan = training_plan(&plan_params(4));
        assert_eq!(plan.schedule.len(), 7);
        assert_eq!(plan.schedule[0].day, "Monday");
        let rest_days = plan
            .schedule
            .iter()
            .filter(|d| d.items[0] == "Rest and recovery")
            .count();
        assert_eq!(rest_days, 3);
        assert!(plan.detail.contains("left shoulder"));
        assert_eq!(plan.title, "6-Week Wheelchair basketball Plan");
    }

    #[test]
    fn test_plan_clamps_out_of_range_frequency() {
        let plan = training_plan(&plan_params(0));
        let training = plan
            .schedule
            .iter()
            .filter(|d| d.items[0] != "Rest and recovery")
            .count();
        assert_eq!(training, 1);

        let plan = training_plan(&plan_params(12));
        assert!(plan
            .schedule
            .iter()
            .all(|d| d.items[0] != "Rest and recovery"));
    }

    #[test]
    fn test_workout_has_four_exercises_with_disability_adaptations() {
        let record = workout(&WorkoutParams {
            disability: Some("below-knee amputation".to_string()),
            difficulty: "advanced".to_string(),
            ..WorkoutParams::default()
        });
        assert_eq!(record.exercises.len(), 4);
        assert_eq!(record.duration, 30);
        assert!(record
            .exercises
            .iter()
            .all(|e| e.adaptations[0].contains("below-knee amputation")));
        assert_eq!(record.exercises[0].sets, 4);
    }

    #[test]
    fn test_diet_calories_follow_weight_and_goal() {
        let record = diet_plan(&DietParams {
            weight_kg: Some(80.0),
            goal: "Lose weight".to_string(),
            restrictions: vec!["vegan".to_string()],
            ..DietParams::default()
        });
        assert_eq!(record.daily_calories, 2100);
        assert_eq!(record.macros, balanced_macros(2100));
        assert!(record.meals[1].foods.contains(&"tofu".to_string()));
        assert_eq!(record.meals.len(), 4);
    }

    #[test]
    fn test_injury_risk_tracks_pain_level() {
        let low = injury_advice(&InjuryParams {
            pain_level: 2,
            ..InjuryParams::default()
        });
        assert_eq!(low.risk_level, "low");
        assert!(!low.see_professional);

        let high = injury_advice(&InjuryParams {
            pain_level: 8,
            body_part: "knee".to_string(),
            ..InjuryParams::default()
        });
        assert_eq!(high.risk_level, "high");
        assert!(high.see_professional);
        assert!(high.summary.contains("knee"));
    }

    #[test]
    fn test_symptom_emergency_signs_escalate() {
        let record = symptom_assessment(&SymptomParams {
            symptoms: vec!["Chest pain during sprints".to_string()],
            ..SymptomParams::default()
        });
        assert_eq!(record.urgency, Urgency::Emergency);

        let record = symptom_assessment(&SymptomParams {
            symptoms: vec!["sore calves".to_string()],
            ..SymptomParams::default()
        });
        assert_eq!(record.urgency, Urgency::Moderate);
    }
}
