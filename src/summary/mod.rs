//! Summary module for precis
//!
//! Pages a document and summarizes it with a rolling fold, one stuffed
//! call, or independent overlapping windows.

pub mod chunker;
mod summarizer;

pub use chunker::{pages, windows, Pages, Windows, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_NZ};
pub use summarizer::{
    Summarizer, SummaryOptions, SummaryStrategy, DEFAULT_CONCURRENCY, DEFAULT_MAX_OUTPUT_TOKENS,
};
