use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::prompts::{CANDIDATE_SUMMARY_PROMPT, VOTING_ASSISTANT_PROMPT};

const COMPLETIONS_PATH: &str = "/chat/completions";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 300;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("GROQ_API_KEY not configured")]
    MissingApiKey,
    #[error("failed to reach completion endpoint: {0}")]
    Connectivity(#[source] reqwest::Error),
    #[error("completion endpoint returned {0}")]
    UpstreamStatus(StatusCode),
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct RelayClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    url: String,
}

impl RelayClient {
    pub fn new(cfg: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            api_key: cfg.groq_api_key.clone(),
            model: cfg.groq_model.clone(),
            url: completions_url(&cfg.groq_base_url),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Answer a voter's question behind the voting assistant prompt.
    pub async fn chat(&self, message: &str) -> Result<String, RelayError> {
        self.complete(VOTING_ASSISTANT_PROMPT, message).await
    }

    /// Condense a scraped candidate biography.
    pub async fn summarize(&self, biography: &str) -> Result<String, RelayError> {
        self.complete(CANDIDATE_SUMMARY_PROMPT, biography).await
    }

    /// Send a system + user conversation and return the first choice's text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, RelayError> {
        let api_key = self.api_key.as_deref().ok_or(RelayError::MissingApiKey)?;

        let request = CompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!(model = %self.model, url = %self.url, "sending completion request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(RelayError::Connectivity)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response body>".to_string());
            warn!(%status, body = %body, "completion endpoint rejected request");
            return Err(RelayError::UpstreamStatus(status));
        }

        let body = response.text().await.map_err(RelayError::Connectivity)?;
        extract_reply(&body)
    }
}

fn completions_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with(COMPLETIONS_PATH) {
        base.to_string()
    } else {
        format!("{base}{COMPLETIONS_PATH}")
    }
}

fn extract_reply(body: &str) -> Result<String, RelayError> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| RelayError::InvalidResponse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| RelayError::InvalidResponse("missing choices[0].message.content".to_string()))
}
