use anyhow::Result;
use async_trait::async_trait;

use crate::config::Settings;
use crate::llm::gemini::GeminiClient;
use crate::llm::ollama::OllamaClient;

/// Text generation request payload.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub prompt: &'a str,
    pub max_output_tokens: u32,
    pub temperature: Option<f32>,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String>;
}

/// Build an LLM provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn LlmProvider>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "gemini" => Ok(Box::new(GeminiClient::from_settings(settings)?)),
        "ollama" => Ok(Box::new(OllamaClient::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported llm.provider '{}'. Supported providers: gemini, ollama",
            other
        ),
    }
}

/// Shared HTTP client for the REST providers.
pub(crate) fn http_client(settings: &Settings, provider: &str) -> Result<reqwest::Client> {
    use anyhow::Context;

    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(settings.llm.timeout_secs))
        .build()
        .with_context(|| format!("Failed to build {} HTTP client", provider))
}
