//! precis - Rolling summarization of long documents
//!
//! Entry point for the precis CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use precis::cli::commands::SummaryOverrides;
use precis::cli::{Cli, Commands};
use precis::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Completions { shell } => {
            precis::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Summarize {
                    input,
                    page_size,
                    strategy,
                    overlap,
                    max_tokens,
                    temperature,
                    output,
                } => {
                    let overrides = SummaryOverrides {
                        strategy,
                        page_size,
                        page_overlap: overlap,
                        max_tokens,
                        temperature,
                    };
                    precis::cli::commands::summarize_document(&settings, input, overrides, output)
                        .await?;
                }
                Commands::Pages {
                    input,
                    page_size,
                    strategy,
                    overlap,
                } => {
                    let overrides = SummaryOverrides {
                        strategy,
                        page_size,
                        page_overlap: overlap,
                        ..SummaryOverrides::default()
                    };
                    precis::cli::commands::show_pages(&settings, input, overrides)?;
                }
                Commands::Prompts => {
                    precis::cli::commands::show_prompts(&settings)?;
                }
                Commands::Config(config_cmd) => {
                    precis::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
