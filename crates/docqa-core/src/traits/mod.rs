//! Core traits for docqa providers.

mod llm;

pub use llm::*;
