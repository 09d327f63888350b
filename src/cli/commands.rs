//! CLI command implementations

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::llm::{build_provider, PromptSet};
use crate::summary::{pages, windows, Summarizer, SummaryOptions, SummaryStrategy};

/// Overrides for `[summary]` settings taken from the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryOverrides {
    pub strategy: Option<SummaryStrategy>,
    pub page_size: Option<usize>,
    pub page_overlap: Option<usize>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl SummaryOverrides {
    fn apply(self, settings: &Settings) -> Settings {
        let mut settings = settings.clone();
        if let Some(strategy) = self.strategy {
            settings.summary.strategy = strategy;
        }
        if let Some(page_size) = self.page_size {
            settings.summary.page_size = page_size;
        }
        if let Some(overlap) = self.page_overlap {
            settings.summary.page_overlap = overlap;
        }
        if let Some(max_tokens) = self.max_tokens {
            settings.summary.max_output_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            settings.summary.temperature = Some(temperature);
        }
        settings
    }
}

/// Summarize a document and print or save the result.
pub async fn summarize_document(
    settings: &Settings,
    input: Option<PathBuf>,
    overrides: SummaryOverrides,
    output: Option<PathBuf>,
) -> Result<()> {
    let settings = overrides.apply(settings);
    let options = SummaryOptions::from_settings(&settings)?;
    let prompts = PromptSet::from_settings(&settings.prompts)?;

    let document = read_input(input.as_deref())?;
    if document.trim().is_empty() {
        anyhow::bail!("Input document is empty");
    }

    let provider = build_provider(&settings)?;
    let summary = Summarizer::new(provider.as_ref(), prompts, options)
        .summarize(&document)
        .await?;

    if let Some(path) = output {
        std::fs::write(&path, format!("{}\n", summary))
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        println!("Summary saved to: {}", path.display());
    } else {
        println!("{}", summary);
    }

    Ok(())
}

/// Print the page layout of a document for the configured strategy.
pub fn show_pages(settings: &Settings, input: Option<PathBuf>, overrides: SummaryOverrides) -> Result<()> {
    let settings = overrides.apply(settings);
    let options = SummaryOptions::from_settings(&settings)?;
    let document = read_input(input.as_deref())?;

    let layout: Vec<&str> = match options.strategy {
        SummaryStrategy::Rolling => pages(&document, options.page_size).collect(),
        SummaryStrategy::Stuff if document.is_empty() => Vec::new(),
        SummaryStrategy::Stuff => vec![document.as_str()],
        SummaryStrategy::OverlappingWindows | SummaryStrategy::MapReduce => {
            windows(&document, options.page_size, options.page_overlap)?.collect()
        }
    };

    println!("{:<6} {:>10} {:>12}", "Page", "Chars", "Offset");
    println!("{}", "-".repeat(30));

    for (i, page) in layout.iter().enumerate() {
        // Pages borrow from `document`, so the byte offset is the pointer distance.
        let offset = page.as_ptr() as usize - document.as_ptr() as usize;
        println!("{:<6} {:>10} {:>12}", i + 1, page.chars().count(), offset);
    }

    let count = layout.len();
    let calls = match (options.strategy, count) {
        (_, 0) => 0,
        (SummaryStrategy::Stuff, _) => 1,
        _ => count + 1,
    };

    println!();
    println!(
        "{} page(s), {} chars, page size {}, strategy {}",
        count,
        document.chars().count(),
        options.page_size,
        options.strategy
    );
    println!("Model calls: {}", calls);

    Ok(())
}

/// Print the rolling and final templates in effect.
pub fn show_prompts(settings: &Settings) -> Result<()> {
    let prompts = PromptSet::from_settings(&settings.prompts)?;

    println!("== Rolling prompt ==");
    println!("{}", prompts.rolling.source());
    println!();
    println!("== Final prompt ==");
    println!("{}", prompts.final_summary.source());

    if !prompts.is_usable() {
        println!();
        println!("warning: a prompt template is empty; summarize will return an empty summary");
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let mut shown = settings.clone();
            if !shown.llm.api_key.is_empty() {
                shown.llm.api_key = "********".to_string();
            }
            let toml = toml::to_string_pretty(&shown)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read document from stdin")?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_values() {
        let settings = Settings::default();
        let merged = SummaryOverrides {
            strategy: Some(SummaryStrategy::Stuff),
            page_size: Some(100),
            page_overlap: None,
            max_tokens: None,
            temperature: Some(0.2),
        }
        .apply(&settings);

        assert_eq!(merged.summary.strategy, SummaryStrategy::Stuff);
        assert_eq!(merged.summary.page_size, 100);
        assert_eq!(merged.summary.page_overlap, 0);
        assert_eq!(merged.summary.max_output_tokens, 256);
        assert_eq!(merged.summary.temperature, Some(0.2));
    }

    #[test]
    fn read_input_reports_missing_file() {
        let err = read_input(Some(Path::new("/nonexistent/precis/doc.txt"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }
}
