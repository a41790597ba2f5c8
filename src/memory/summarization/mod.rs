//! LLM-based summarization of chunks.

pub mod summarizer;

pub use summarizer::{SUMMARY_FAILED, Summarizer, summary_prompt};
