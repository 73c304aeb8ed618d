//! Prompt domain
//!
//! Templates for participant contributions and round summaries.

mod template;

pub use template::PromptTemplate;
