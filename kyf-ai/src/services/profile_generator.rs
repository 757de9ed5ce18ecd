//! LLM-generated profile attributes
//!
//! Two sequential chat calls per fan: one for the marketing insights
//! block (fanType, engagementScore, contentPreference, potentialRevenue,
//! recommendationSummary), one for the personalized chatbot system
//! prompt. Both answers must be strict JSON; missing keys leave the
//! corresponding field null.

use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use crate::models::FanProfile;

use super::llm_client::{strip_code_fence, ChatMessage, LlmClient, LlmError};

/// Profile generation errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Model answer is not valid JSON: {0}")]
    InvalidAnswer(String),
}

/// Marketing insights block produced by the first chat call
#[derive(Debug, Clone, Default)]
pub struct ProfileInsights {
    pub fan_type: Option<String>,
    pub engagement_score: Option<i64>,
    pub content_preference: Option<String>,
    pub potential_revenue: Option<String>,
    pub recommendation_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInsights {
    #[serde(default)]
    fan_type: Option<String>,
    // Models answer with integers or floats interchangeably
    #[serde(default)]
    engagement_score: Option<f64>,
    #[serde(default)]
    content_preference: Option<String>,
    #[serde(default)]
    potential_revenue: Option<String>,
    #[serde(default)]
    recommendation_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChatbot {
    #[serde(default)]
    personal_chatbot: Option<String>,
}

/// LLM-backed profile attribute generator
pub struct ProfileGenerator {
    llm: Arc<LlmClient>,
}

impl ProfileGenerator {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    /// First chat call: the marketing insights block.
    pub async fn generate_insights(&self, fan: &FanProfile) -> Result<ProfileInsights, ProfileError> {
        let prompt = render_insights_prompt(fan);
        let answer = self.llm.chat(&[ChatMessage::user(prompt)]).await?;
        let insights = parse_insights(&answer)?;

        tracing::info!(
            fan_type = insights.fan_type.as_deref().unwrap_or("-"),
            engagement_score = insights.engagement_score,
            "Profile insights generated"
        );

        Ok(insights)
    }

    /// Second chat call: the personalized chatbot system prompt.
    ///
    /// Expects the profile to already carry the insights block so the
    /// rendered prompt can reference the fan type.
    pub async fn generate_chatbot_prompt(
        &self,
        fan: &FanProfile,
    ) -> Result<Option<String>, ProfileError> {
        let prompt = render_chatbot_prompt(fan);
        let answer = self.llm.chat(&[ChatMessage::user(prompt)]).await?;
        parse_chatbot(&answer)
    }
}

fn render_insights_prompt(fan: &FanProfile) -> String {
    format!(
        "You are a specialist in marketing and e-sports fan behavior.\n\
         \n\
         Based on the data below, analyze the fan profile and produce a JSON object \
         with the following keys:\n\
         \n\
         - fanType: the kind of fan (e.g. \"super fan\", \"casual\", \"newcomer\"), based on engagement.\n\
         - engagementScore: a number between 0 and 100 representing involvement with the brand.\n\
         - contentPreference: the fan's preferred content type (e.g. behind the scenes, gameplay, interviews).\n\
         - potentialRevenue: estimated value as a customer (e.g. \"low\", \"medium\", \"high\").\n\
         - recommendationSummary: a personalized summary explaining the fan profile.\n\
         \n\
         ### Instructions:\n\
         - Use only the information provided.\n\
         - Be coherent and objective.\n\
         - Answer exclusively with a valid JSON object containing only those keys and their values.\n\
         - Do not add explanations, comments or any text outside the JSON.\n\
         \n\
         ### Fan data:\n\
         - Name: {name}\n\
         - Social networks followed: {socials}\n\
         - Preferred content: {content}\n\
         - E-commerce purchases: {ecommerce}\n\
         - Influencers: {influencers}\n\
         - Events: {events}\n\
         - Favorite game: {favorite_game}\n\
         - Location: {location}\n\
         - Wants exclusive content: {exclusive_content}\n\
         - Message: {message}\n",
        name = fan.full_name,
        socials = join_or(&fan.socials, "none"),
        content = join_or(&fan.content, "none"),
        ecommerce = join_or(&fan.ecommerce, "none"),
        influencers = text_or(&fan.influencers, "none"),
        events = text_or(&fan.events, "none"),
        favorite_game = text_or(&fan.favorite_game, "not informed"),
        location = fan.location,
        exclusive_content = text_or(&fan.exclusive_content, "not informed"),
        message = text_or(&fan.message, "none"),
    )
}

fn render_chatbot_prompt(fan: &FanProfile) -> String {
    format!(
        "You are a prompt engineer. Based on the fan data below, create a system prompt \
         that will be sent to an AI so it acts as the official chatbot of an e-sports \
         organization, generating personalized and exciting messages for this fan according \
         to their engagement with the brand. Answer in JSON with the key \"personalChatbot\" \
         whose value is the generated system prompt.\n\
         \n\
         The generated system prompt must instruct the AI to:\n\
         - Greet the fan by name ({name}) and use the nickname ({nickname}) in casual interactions.\n\
         - Adapt message content and tone to the fan's engagement level ({fan_type}).\n\
         - If they already bought products ({ecommerce}), recommend exclusive items and limited releases.\n\
         - If they attend events ({events}), encourage interaction and share behind-the-scenes details.\n\
         - Mention the content types the fan enjoys ({content}), with relevant insights.\n\
         - Prioritize the fan's favorite game ({favorite_game}) while also mentioning the organization's other popular titles.\n\
         - Comment on influencers the fan follows ({influencers}), with recent news about them.\n\
         - Tailor suggestions to the fan's location ({location}) to highlight nearby content and events.\n\
         - Address the fan's interest in exclusive content ({exclusive_content}) and propose special benefits.\n\
         - Suggest ways to connect on the fan's social networks ({socials}).\n\
         - Suggest engaging interactions such as first-hand news, tournament and training backstage access, \
           trivia about their favorite player, and challenges or polls.\n\
         - Keep an excited, informal, engaging tone with vocabulary aimed at e-sports fans.\n\
         - Avoid generic answers; bring concrete details about the organization and its ecosystem.\n",
        name = fan.full_name,
        nickname = fan.nickname,
        fan_type = text_or(&fan.fan_type, "unknown"),
        ecommerce = join_or(&fan.ecommerce, "none"),
        events = text_or(&fan.events, "none"),
        content = join_or(&fan.content, "none"),
        favorite_game = text_or(&fan.favorite_game, "not informed"),
        influencers = text_or(&fan.influencers, "none"),
        location = fan.location,
        exclusive_content = text_or(&fan.exclusive_content, "not informed"),
        socials = join_or(&fan.socials, "none"),
    )
}

fn parse_insights(answer: &str) -> Result<ProfileInsights, ProfileError> {
    let raw: RawInsights = serde_json::from_str(strip_code_fence(answer)).map_err(|e| {
        tracing::debug!(answer = %answer, "Unparseable insights answer");
        ProfileError::InvalidAnswer(e.to_string())
    })?;

    Ok(ProfileInsights {
        fan_type: raw.fan_type,
        engagement_score: raw.engagement_score.map(|score| score.round() as i64),
        content_preference: raw.content_preference,
        potential_revenue: raw.potential_revenue,
        recommendation_summary: raw.recommendation_summary,
    })
}

fn parse_chatbot(answer: &str) -> Result<Option<String>, ProfileError> {
    let raw: RawChatbot = serde_json::from_str(strip_code_fence(answer)).map_err(|e| {
        tracing::debug!(answer = %answer, "Unparseable chatbot answer");
        ProfileError::InvalidAnswer(e.to_string())
    })?;
    Ok(raw.personal_chatbot)
}

fn join_or(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.join(", ")
    }
}

fn text_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fan() -> FanProfile {
        serde_json::from_value(serde_json::json!({
            "fullName": "Ana Souza",
            "nickname": "aninha",
            "email": "ana@example.com",
            "username": "ana.souza",
            "password": "hunter2",
            "cpfDisplay": "123.456.789-00",
            "cpf": "12345678900",
            "location": "São Paulo",
            "socials": ["twitch"],
            "ecommerce": [],
            "content": ["gameplay", "interviews"]
        }))
        .unwrap()
    }

    #[test]
    fn test_insights_prompt_renders_attributes_and_fallbacks() {
        let prompt = render_insights_prompt(&sample_fan());
        assert!(prompt.contains("Ana Souza"));
        assert!(prompt.contains("gameplay, interviews"));
        assert!(prompt.contains("E-commerce purchases: none"));
        assert!(prompt.contains("Favorite game: not informed"));
    }

    #[test]
    fn test_chatbot_prompt_uses_generated_fan_type() {
        let mut fan = sample_fan();
        fan.fan_type = Some("super fan".to_string());
        let prompt = render_chatbot_prompt(&fan);
        assert!(prompt.contains("engagement level (super fan)"));
        assert!(prompt.contains("(aninha)"));
    }

    #[test]
    fn test_parses_insights_with_fence_and_float_score() {
        let answer = "```json\n{\"fanType\": \"super fan\", \"engagementScore\": 87.4, \
                      \"contentPreference\": \"gameplay\", \"potentialRevenue\": \"high\", \
                      \"recommendationSummary\": \"Highly engaged.\"}\n```";
        let insights = parse_insights(answer).unwrap();
        assert_eq!(insights.fan_type.as_deref(), Some("super fan"));
        assert_eq!(insights.engagement_score, Some(87));
        assert_eq!(insights.potential_revenue.as_deref(), Some("high"));
    }

    #[test]
    fn test_missing_insight_keys_stay_none() {
        let insights = parse_insights("{\"fanType\": \"casual\"}").unwrap();
        assert_eq!(insights.fan_type.as_deref(), Some("casual"));
        assert!(insights.engagement_score.is_none());
        assert!(insights.recommendation_summary.is_none());
    }

    #[test]
    fn test_non_json_insights_answer_is_an_error() {
        assert!(matches!(
            parse_insights("The fan seems very engaged!"),
            Err(ProfileError::InvalidAnswer(_))
        ));
    }

    #[test]
    fn test_parses_chatbot_answer() {
        let answer = "{\"personalChatbot\": \"You are the official chatbot...\"}";
        let chatbot = parse_chatbot(answer).unwrap();
        assert_eq!(chatbot.as_deref(), Some("You are the official chatbot..."));
    }

    #[test]
    fn test_chatbot_answer_without_key_is_none() {
        assert_eq!(parse_chatbot("{}").unwrap(), None);
    }
}
