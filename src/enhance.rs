//! Best-effort AI polishing of free-text fields.
//!
//! Enhancement never blocks document creation: a field whose call fails,
//! times out or comes back empty keeps the user's own text.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::json;
use std::{collections::HashMap, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{config::AiConfig, sanitize::sanitize};

const SYSTEM_PROMPT: &str = "You rewrite text for UK construction health and safety documents. \
Keep every fact, measurement and name. Use clear, professional British English. \
Return only the rewritten text without headings or commentary.";

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("text enhancement is disabled")]
    Disabled,
    #[error("enhancement request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("enhancement service responded with status {0}")]
    Status(u16),
    #[error("enhancement service returned no text")]
    Empty,
    #[error("enhancement timed out after {0:?}")]
    TimedOut(Duration),
}

#[async_trait]
pub trait TextEnhancer: Send + Sync {
    async fn enhance(&self, field: &str, draft: &str) -> Result<String, EnhanceError>;
}

pub struct DisabledEnhancer;

#[async_trait]
impl TextEnhancer for DisabledEnhancer {
    async fn enhance(&self, _field: &str, _draft: &str) -> Result<String, EnhanceError> {
        Err(EnhanceError::Disabled)
    }
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiEnhancer {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}
#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiEnhancer {
    pub fn new(config: &AiConfig, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            url: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl TextEnhancer for OpenAiEnhancer {
    async fn enhance(&self, field: &str, draft: &str) -> Result<String, EnhanceError> {
        let body = json!({
            "model": self.model,
            "temperature": 0.3,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("Field: {field}\n\n{draft}") },
            ],
        });
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(EnhanceError::Status(response.status().as_u16()));
        }
        let response: ChatResponse = response.json().await?;
        response
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|text| sanitize(&text))
            .filter(|text| !text.is_empty())
            .ok_or(EnhanceError::Empty)
    }
}

pub fn from_config(config: &AiConfig) -> Arc<dyn TextEnhancer> {
    match &config.api_key {
        Some(key) => Arc::new(OpenAiEnhancer::new(config, key)),
        None => Arc::new(DisabledEnhancer),
    }
}

/// Enhances every non-empty field concurrently, each under `limit`.
/// Only fields that were actually improved appear in the result.
pub async fn enhance_fields(
    enhancer: &dyn TextEnhancer,
    fields: Vec<(&'static str, String)>,
    limit: Duration,
) -> HashMap<&'static str, String> {
    let calls = fields
        .into_iter()
        .filter(|(_, draft)| !draft.trim().is_empty())
        .map(move |(field, draft)| async move {
            let result = match tokio::time::timeout(limit, enhancer.enhance(field, &draft)).await {
                Ok(result) => result,
                Err(_) => Err(EnhanceError::TimedOut(limit)),
            };
            (field, result)
        });

    let mut enhanced = HashMap::new();
    for (field, result) in join_all(calls).await {
        match result {
            Ok(text) => {
                enhanced.insert(field, text);
            }
            Err(EnhanceError::Disabled) => debug!(field, "enhancement skipped"),
            Err(error) => warn!(field, %error, "enhancement failed, keeping original text"),
        }
    }
    enhanced
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shouting;

    #[async_trait]
    impl TextEnhancer for Shouting {
        async fn enhance(&self, field: &str, draft: &str) -> Result<String, EnhanceError> {
            if field == "broken" {
                return Err(EnhanceError::Status(500));
            }
            if field == "slow" {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(draft.to_uppercase())
        }
    }

    #[tokio::test]
    async fn failures_and_timeouts_fall_back_silently() {
        let enhanced = enhance_fields(
            &Shouting,
            vec![
                ("scope", "rewire the house".to_string()),
                ("broken", "keep me".to_string()),
                ("slow", "too slow".to_string()),
                ("empty", "   ".to_string()),
            ],
            Duration::from_millis(50),
        )
        .await;

        assert_eq!(enhanced.get("scope").map(String::as_str), Some("REWIRE THE HOUSE"));
        assert_eq!(enhanced.len(), 1);
    }

    #[tokio::test]
    async fn disabled_enhancer_returns_nothing() {
        let enhanced = enhance_fields(
            &DisabledEnhancer,
            vec![("scope", "text".to_string())],
            Duration::from_secs(1),
        )
        .await;
        assert!(enhanced.is_empty());
    }

    #[test]
    fn completions_url_is_built_from_base() {
        let config = AiConfig {
            api_url: "https://api.openai.com/v1/".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(1),
        };
        let client = OpenAiEnhancer::new(&config, "key");
        assert_eq!(client.url, "https://api.openai.com/v1/chat/completions");
    }
}
