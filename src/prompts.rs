use crate::models::ContentKind;

pub const JSON_RULES: &str = include_str!("../data/prompts/json_rules.txt");
pub const PLAN_SYSTEM: &str = include_str!("../data/prompts/plan_system.txt");
pub const WORKOUT_SYSTEM: &str = include_str!("../data/prompts/workout_system.txt");
pub const DIET_SYSTEM: &str = include_str!("../data/prompts/diet_system.txt");
pub const CAREER_SYSTEM: &str = include_str!("../data/prompts/career_system.txt");
pub const FINANCIAL_SYSTEM: &str = include_str!("../data/prompts/financial_system.txt");
pub const INJURY_SYSTEM: &str = include_str!("../data/prompts/injury_system.txt");
pub const SYMPTOM_SYSTEM: &str = include_str!("../data/prompts/symptom_system.txt");
pub const NUTRITION_SYSTEM: &str = include_str!("../data/prompts/nutrition_system.txt");
pub const CHAT_SYSTEM: &str = include_str!("../data/prompts/chat_system.txt");
pub const USER_REQUEST: &str = include_str!("../data/prompts/user_request.txt");
pub const CHAT_USER: &str = include_str!("../data/prompts/chat_user.txt");
pub const TRANSLATE_SYSTEM: &str = include_str!("../data/prompts/translate_system.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// System instruction for `kind`. JSON kinds get the formatting rules appended.
pub fn system_instruction(kind: ContentKind) -> String {
    let body = match kind {
        ContentKind::Plan => PLAN_SYSTEM,
        ContentKind::Workout => WORKOUT_SYSTEM,
        ContentKind::Diet => DIET_SYSTEM,
        ContentKind::Career => CAREER_SYSTEM,
        ContentKind::Financial => FINANCIAL_SYSTEM,
        ContentKind::Injury => INJURY_SYSTEM,
        ContentKind::Symptom => SYMPTOM_SYSTEM,
        ContentKind::Nutrition => NUTRITION_SYSTEM,
        ContentKind::Chat => return CHAT_SYSTEM.trim_end().to_string(),
    };
    format!("{}\n{}", body.trim_end(), JSON_RULES.trim_end())
}
