//! precis - Rolling summarization of arbitrarily long documents
//!
//! A document is split into fixed-size pages, a running summary is folded
//! across them with one model call per page, and the collected page
//! summaries are combined into a final structured summary.

pub mod cli;
pub mod config;
pub mod llm;
pub mod summary;

use thiserror::Error;

/// Main error type for precis
#[derive(Error, Debug)]
pub enum PrecisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, PrecisError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "precis";
