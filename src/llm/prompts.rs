//! Prompt templates for rolling summarization

use std::path::Path;

use crate::config::PromptSettings;
use crate::{PrecisError, Result};

/// Placeholder carrying the running summary in the rolling template.
pub const CONTEXT_PLACEHOLDER: &str = "context";

/// Placeholder carrying the text to summarize.
pub const TEXT_PLACEHOLDER: &str = "text";

const ROLLING_TEMPLATE: &str = "Taking the following context delimited by double backquotes into consideration:\n\
\n\
``{context}``\n\
\n\
Write a concise summary of the following text delimited by double backquotes.\n\
\n\
``{text}``\n\
\n\
CONCISE SUMMARY:";

const FINAL_TEMPLATE: &str = "Please give me a summary with an introduction, three one-sentence bullet points, \
and a conclusion from the following text delimited by double backquotes.\n\
\n\
``Text:{text}``\n\
\n\
SUMMARY:";

/// A prompt with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Read a template from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            PrecisError::Template(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::new(source))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the template has no content worth sending.
    pub fn is_blank(&self) -> bool {
        self.source.trim().is_empty()
    }

    /// Substitute known placeholders in a single pass.
    ///
    /// Unknown `{names}` and unmatched braces are kept verbatim, and
    /// substituted values are not scanned again.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let value = after.find('}').and_then(|close| {
                let name = &after[..close];
                vars.iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value, close))
            });

            match value {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// The rolling and final templates used by one summarization run.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub rolling: PromptTemplate,
    pub final_summary: PromptTemplate,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptSet {
    /// Built-in templates.
    pub fn builtin() -> Self {
        Self {
            rolling: PromptTemplate::new(ROLLING_TEMPLATE),
            final_summary: PromptTemplate::new(FINAL_TEMPLATE),
        }
    }

    /// Built-in templates with any configured file overrides applied.
    pub fn from_settings(settings: &PromptSettings) -> Result<Self> {
        let mut set = Self::builtin();

        if let Some(path) = &settings.rolling_path {
            tracing::debug!("Loading rolling prompt from {}", path.display());
            set.rolling = PromptTemplate::load(path)?;
        }
        if let Some(path) = &settings.final_path {
            tracing::debug!("Loading final prompt from {}", path.display());
            set.final_summary = PromptTemplate::load(path)?;
        }

        Ok(set)
    }

    /// Both templates must carry content before the model is called.
    pub fn is_usable(&self) -> bool {
        !self.rolling.is_blank() && !self.final_summary.is_blank()
    }

    pub fn rolling_prompt(&self, context: &str, page: &str) -> String {
        self.rolling
            .render(&[(CONTEXT_PLACEHOLDER, context), (TEXT_PLACEHOLDER, page)])
    }

    pub fn final_prompt(&self, summaries: &str) -> String {
        self.final_summary.render(&[(TEXT_PLACEHOLDER, summaries)])
    }
}
