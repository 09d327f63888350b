use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::llm::client::{http_client, GenerationRequest, LlmProvider};

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

/// Client for a local Ollama server.
pub struct OllamaClient {
    http: Client,
    model: String,
    endpoint: String,
}

impl OllamaClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model = match settings.llm.model.trim() {
            "" => DEFAULT_OLLAMA_MODEL.to_string(),
            model => model.to_string(),
        };

        let endpoint = match settings.llm.endpoint.trim().trim_end_matches('/') {
            "" => DEFAULT_OLLAMA_ENDPOINT.to_string(),
            endpoint => endpoint.to_string(),
        };

        Ok(Self {
            http: http_client(settings, "Ollama")?,
            model,
            endpoint,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/api/generate", self.endpoint)
    }
}

#[async_trait]
impl LlmProvider for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt: request.prompt,
            stream: false,
            options: OllamaOptions {
                num_predict: request.max_output_tokens,
                temperature: request.temperature,
            },
        };

        tracing::debug!(
            model = %self.model,
            prompt_chars = request.prompt.chars().count(),
            "Sending Ollama generate request"
        );

        let response = self
            .http
            .post(self.request_url())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Ollama request to {} failed", self.endpoint))?;

        let response = response
            .error_for_status()
            .context("Ollama returned an error status")?;

        let payload: OllamaGenerateResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        let text = payload.response.trim();
        if text.is_empty() {
            anyhow::bail!("Ollama response did not contain any text");
        }

        Ok(text.to_string())
    }
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}
