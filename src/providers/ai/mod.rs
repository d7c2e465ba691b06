//! Text-generation backends.
//!
//! This module provides the non-streaming [`TextGenerator`] contract the
//! summarization pipeline depends on, and the Ollama-backed implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use breve::providers::ai::{CompletionRequest, OllamaGenerator, TextGenerator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = OllamaGenerator::llama3();
//!
//! let request = CompletionRequest::new("Summarize: the meeting moved to Friday.");
//! let response = generator.complete(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

mod ollama;
mod traits;

pub use ollama::OllamaGenerator;
pub use traits::{CompletionRequest, CompletionResponse, LlmError, LlmResult, TextGenerator};

#[cfg(test)]
pub use traits::MockTextGenerator;
