//! Language-model phrasing of outfit recommendations.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. The rule-based
//! [`OutfitRecommendation`] is sent along as JSON so the model only rewords it.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    Config,
    config::ServiceId,
    model::{CurrentWeather, OutfitRecommendation},
    provider::openweather::truncate_body,
    units::format_temperature,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT_SECS: u64 = 30;

const SYSTEM_PROMPT: &str = "You are a friendly stylist. Given current weather and a structured \
outfit suggestion, write a short, practical clothing recommendation in two or three sentences. \
Do not invent weather details.";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Failed to reach the language-model service: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Language-model request failed with status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("Unexpected language-model response: {0}")]
    InvalidResponse(String),

    #[error("No API key configured for the language-model service")]
    MissingApiKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl AssistantConfig {
    pub fn from_config(config: &Config) -> Result<Self, AssistantError> {
        let api_key = config.api_key(ServiceId::OpenAi).ok_or(AssistantError::MissingApiKey)?;
        let svc = config.service_config(ServiceId::OpenAi);

        Ok(Self {
            api_key,
            base_url: svc
                .and_then(|s| s.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: svc
                .and_then(|s| s.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

#[derive(Debug)]
pub struct Assistant {
    http: Client,
    config: AssistantConfig,
}

impl Assistant {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        info!(base_url = %config.base_url, model = %config.model, "initialized assistant");

        Ok(Self { http, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Ask the model to phrase `outfit` for the given conditions.
    #[instrument(skip_all, fields(model = %self.config.model))]
    pub async fn phrase(
        &self,
        current: &CurrentWeather,
        outfit: &OutfitRecommendation,
    ) -> Result<String, AssistantError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user", content: build_prompt(current, outfit) },
            ],
            temperature: 0.7,
        };

        debug!("sending chat completion request");

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            warn!(%status, "chat completion request failed");
            return Err(AssistantError::Status { status, body: truncate_body(&body) });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AssistantError::InvalidResponse("empty completion".to_string()))
    }
}

/// User message describing the weather and the rule-based outfit.
pub fn build_prompt(current: &CurrentWeather, outfit: &OutfitRecommendation) -> String {
    let sample = &current.sample;
    let outfit_json = serde_json::to_string(outfit).unwrap_or_default();

    format!(
        "Location: {}, {}\n\
         Temperature: {} (feels like {})\n\
         Conditions: {} ({})\n\
         Time of day: {}\n\
         Suggested outfit (JSON): {}",
        current.location_name,
        current.country,
        format_temperature(sample.temperature_c, true),
        format_temperature(sample.feels_like_c, true),
        sample.condition.main,
        sample.condition.description,
        if current.is_day() { "day" } else { "night" },
        outfit_json,
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}
