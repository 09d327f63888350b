//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::summary::SummaryStrategy;

/// precis - Rolling summarization of long documents with LLMs
#[derive(Parser, Debug)]
#[command(name = "precis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a document
    Summarize {
        /// Input file ("-" or omitted reads stdin)
        input: Option<PathBuf>,

        /// Page size in characters (overrides summary.page_size)
        #[arg(short, long)]
        page_size: Option<usize>,

        /// Summary strategy (overrides summary.strategy)
        #[arg(short, long, value_enum)]
        strategy: Option<SummaryStrategy>,

        /// Characters shared by consecutive windows (overrides summary.page_overlap)
        #[arg(long)]
        overlap: Option<usize>,

        /// Output token cap per model call (overrides summary.max_output_tokens)
        #[arg(short = 'm', long)]
        max_tokens: Option<u32>,

        /// Sampling temperature (overrides summary.temperature)
        #[arg(short, long)]
        temperature: Option<f32>,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how a document would be paged, without calling the model
    Pages {
        /// Input file ("-" or omitted reads stdin)
        input: Option<PathBuf>,

        /// Page size in characters (overrides summary.page_size)
        #[arg(short, long)]
        page_size: Option<usize>,

        /// Summary strategy (overrides summary.strategy)
        #[arg(short, long, value_enum)]
        strategy: Option<SummaryStrategy>,

        /// Characters shared by consecutive windows (overrides summary.page_overlap)
        #[arg(long)]
        overlap: Option<usize>,
    },

    /// Print the effective prompt templates
    Prompts,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
