//! Configuration module for precis
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::{LlmSettings, PromptSettings, Settings, SummarySettings, API_KEY_ENV};
