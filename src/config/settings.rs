//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::summary::{
    SummaryStrategy, DEFAULT_CONCURRENCY, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_PAGE_SIZE_NZ,
};
use crate::PrecisError;

/// Environment variable consulted when `llm.api_key` is empty.
pub const API_KEY_ENV: &str = "PRECIS_GEMINI_API_KEY";

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// LLM provider settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Rolling summarization settings
    #[serde(default)]
    pub summary: SummarySettings,

    /// Prompt template overrides
    #[serde(default)]
    pub prompts: PromptSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (gemini, ollama)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key (for cloud providers)
    #[serde(default)]
    pub api_key: String,

    /// Model name (empty = provider default)
    #[serde(default)]
    pub model: String,

    /// API endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// HTTP timeout per model call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySettings {
    /// rolling, stuff, overlapping-windows or map-reduce
    #[serde(default)]
    pub strategy: SummaryStrategy,

    /// Page size in characters
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Characters shared by consecutive windows (windowed strategies only)
    #[serde(default)]
    pub page_overlap: usize,

    /// Window calls in flight for map-reduce
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Output token cap for every model call
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Sampling temperature (unset = provider default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptSettings {
    /// File replacing the built-in rolling template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolling_path: Option<PathBuf>,

    /// File replacing the built-in final template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_path: Option<PathBuf>,
}

// Default value functions

fn default_llm_provider() -> String {
    "gemini".to_string()
}

fn default_timeout_secs() -> u64 {
    45
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE_NZ.get()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY.get()
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            strategy: SummaryStrategy::default(),
            page_size: default_page_size(),
            page_overlap: 0,
            concurrency: default_concurrency(),
            max_output_tokens: default_max_output_tokens(),
            temperature: None,
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let mut settings = Self::from_file(&config_path)?;
        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Parse settings from a TOML file without env overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if self.llm.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                if !key.trim().is_empty() {
                    self.llm.api_key = key;
                }
            }
        }
    }

    /// Reject values the summarizer cannot run with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.summary.page_size == 0 {
            return Err(PrecisError::Config(
                "summary.page_size must be greater than zero".to_string(),
            ));
        }
        if self.summary.page_overlap >= self.summary.page_size {
            return Err(PrecisError::Config(format!(
                "summary.page_overlap ({}) must be smaller than summary.page_size ({})",
                self.summary.page_overlap, self.summary.page_size
            )));
        }
        if self.summary.concurrency == 0 {
            return Err(PrecisError::Config(
                "summary.concurrency must be greater than zero".to_string(),
            ));
        }
        if self.summary.max_output_tokens == 0 {
            return Err(PrecisError::Config(
                "summary.max_output_tokens must be greater than zero".to_string(),
            ));
        }
        if let Some(t) = self.summary.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(PrecisError::Config(format!(
                    "summary.temperature must be between 0.0 and 2.0, got {}",
                    t
                )));
            }
        }
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "precis", "precis")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
