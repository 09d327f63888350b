//! Rolling summarization over paged documents

use anyhow::{Context, Result};
use futures::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::num::NonZeroUsize;
use std::time::Instant;

use crate::config::Settings;
use crate::llm::{GenerationRequest, LlmProvider, PromptSet};
use crate::summary::chunker::{self, pages, windows, Windows};
use crate::PrecisError;

/// Default output cap for every model call.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 256;

/// Default number of window calls in flight for map-reduce.
pub const DEFAULT_CONCURRENCY: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(n) => n,
    None => panic!("DEFAULT_CONCURRENCY must be non-zero"),
};

/// How page summaries are produced before the final call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStrategy {
    /// Fold a running summary across non-overlapping pages
    #[default]
    Rolling,
    /// Send the whole document to the final prompt in one call
    Stuff,
    /// Summarize overlapping windows one after another, without context
    OverlappingWindows,
    /// Summarize overlapping windows concurrently, without context
    MapReduce,
}

impl SummaryStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rolling => "rolling",
            Self::Stuff => "stuff",
            Self::OverlappingWindows => "overlapping-windows",
            Self::MapReduce => "map-reduce",
        }
    }
}

impl fmt::Display for SummaryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run knobs for the summarizer.
#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    pub strategy: SummaryStrategy,
    pub page_size: NonZeroUsize,
    /// Characters shared by consecutive windows; ignored by `Rolling`.
    pub page_overlap: usize,
    pub max_output_tokens: u32,
    pub temperature: Option<f32>,
    pub concurrency: NonZeroUsize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            strategy: SummaryStrategy::default(),
            page_size: chunker::DEFAULT_PAGE_SIZE_NZ,
            page_overlap: 0,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl SummaryOptions {
    pub fn from_settings(settings: &Settings) -> crate::Result<Self> {
        settings.validate()?;

        Ok(Self {
            strategy: settings.summary.strategy,
            page_size: chunker::page_size(settings.summary.page_size)?,
            page_overlap: settings.summary.page_overlap,
            max_output_tokens: settings.summary.max_output_tokens,
            temperature: settings.summary.temperature,
            concurrency: NonZeroUsize::new(settings.summary.concurrency).ok_or_else(|| {
                PrecisError::Config("summary.concurrency must be greater than zero".to_string())
            })?,
        })
    }
}

/// Folds a running summary across the pages of a document, then asks for
/// a structured summary of everything collected along the way.
pub struct Summarizer<'a> {
    provider: &'a dyn LlmProvider,
    prompts: PromptSet,
    options: SummaryOptions,
}

impl<'a> Summarizer<'a> {
    pub fn new(provider: &'a dyn LlmProvider, prompts: PromptSet, options: SummaryOptions) -> Self {
        Self {
            provider,
            prompts,
            options,
        }
    }

    /// Summarize `document`.
    ///
    /// With the default rolling strategy this makes one model call per page
    /// followed by one final call. Returns an empty string without calling
    /// the model when either template is blank.
    pub async fn summarize(&self, document: &str) -> Result<String> {
        if !self.prompts.is_usable() {
            tracing::warn!("Prompt template is empty, skipping summarization");
            return Ok(String::new());
        }

        let start = Instant::now();
        tracing::info!(
            provider = self.provider.name(),
            strategy = %self.options.strategy,
            page_size = self.options.page_size.get(),
            "Summary flow: start"
        );

        let (combined, page_count): (Cow<'_, str>, usize) = match self.options.strategy {
            SummaryStrategy::Rolling => {
                let summaries = self.rolling(document).await?;
                (Cow::Owned(summaries.join("\n")), summaries.len())
            }
            SummaryStrategy::Stuff => (Cow::Borrowed(document), 0),
            SummaryStrategy::OverlappingWindows => {
                let summaries = self.sequential_windows(document).await?;
                (Cow::Owned(summaries.join("\n")), summaries.len())
            }
            SummaryStrategy::MapReduce => {
                let summaries = self.map_reduce(document).await?;
                (Cow::Owned(summaries.join("\n")), summaries.len())
            }
        };

        let prompt = self.prompts.final_prompt(&combined);
        let summary = self
            .generate(&prompt)
            .await
            .context("Final summary failed")?;

        tracing::info!(
            pages = page_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Summary flow: end"
        );

        Ok(summary)
    }

    async fn rolling(&self, document: &str) -> Result<Vec<String>> {
        // Overwritten after every page; only the latest summary feeds forward.
        let mut context = String::new();
        let mut summaries = Vec::new();

        for (i, page) in pages(document, self.options.page_size).enumerate() {
            tracing::debug!("Summarizing page {} ({} chars)", i + 1, page.chars().count());

            let prompt = self.prompts.rolling_prompt(&context, page);
            context = self
                .generate(&prompt)
                .await
                .with_context(|| format!("Rolling summary failed on page {}", i + 1))?;
            summaries.push(context.clone());
        }

        Ok(summaries)
    }

    async fn sequential_windows(&self, document: &str) -> Result<Vec<String>> {
        let mut summaries = Vec::new();

        for (i, window) in self.window_iter(document)?.enumerate() {
            tracing::debug!("Summarizing window {} ({} chars)", i + 1, window.chars().count());

            let prompt = self.prompts.rolling_prompt("", window);
            let summary = self
                .generate(&prompt)
                .await
                .with_context(|| format!("Window summary failed on window {}", i + 1))?;
            summaries.push(summary);
        }

        Ok(summaries)
    }

    /// Window calls run concurrently; results come back in window order.
    async fn map_reduce(&self, document: &str) -> Result<Vec<String>> {
        let windows = self.window_iter(document)?;

        futures::stream::iter(windows.enumerate())
            .map(|(i, window)| async move {
                let prompt = self.prompts.rolling_prompt("", window);
                self.generate(&prompt)
                    .await
                    .with_context(|| format!("Window summary failed on window {}", i + 1))
            })
            .buffered(self.options.concurrency.get())
            .try_collect()
            .await
    }

    fn window_iter<'d>(&self, document: &'d str) -> crate::Result<Windows<'d>> {
        windows(document, self.options.page_size, self.options.page_overlap)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.provider
            .generate(GenerationRequest {
                prompt,
                max_output_tokens: self.options.max_output_tokens,
                temperature: self.options.temperature,
            })
            .await
    }
}
