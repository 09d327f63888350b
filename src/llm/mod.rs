//! LLM module for precis
//!
//! Provider abstraction over hosted and local text-generation models, plus
//! the prompt templates used by the summarizer.

mod client;
mod gemini;
mod ollama;
pub mod prompts;

pub use client::{build_provider, GenerationRequest, LlmProvider};
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use prompts::{PromptSet, PromptTemplate};
