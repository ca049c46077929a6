use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::dto::{ChatMessage, ChatRequest, ChatResponse};
use crate::config::AdviceConfig;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, thiserror::Error)]
pub enum AdviceError {
    #[error("API Key not set")]
    MissingApiKey,
    #[error("Error communicating with OpenAI")]
    Transport(#[source] reqwest::Error),
    #[error("Error communicating with OpenAI")]
    Upstream(reqwest::StatusCode),
    #[error("Error parsing OpenAI response")]
    Parse(#[source] serde_json::Error),
    #[error("No response from OpenAI")]
    Empty,
}

/// Outbound completion service used for task advice.
#[async_trait]
pub trait AdviceClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AdviceError>;
}

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(cfg: &AdviceConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build advice http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            api_url: cfg.api_url.clone(),
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl AdviceClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, AdviceError> {
        let api_key = self.api_key.as_deref().ok_or(AdviceError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let res = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(AdviceError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            warn!(%status, "completion endpoint returned an error status");
            return Err(AdviceError::Upstream(status));
        }

        let bytes = res.bytes().await.map_err(AdviceError::Transport)?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes).map_err(AdviceError::Parse)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AdviceError::Empty)?;
        debug!(len = content.len(), "completion received");
        Ok(content)
    }
}
