//! Text-generation provider adapters.

pub mod gemini;
pub mod openai;

pub use gemini::{GeminiCompletionConfig, GeminiCompletionProvider};
pub use openai::{OpenAiCompletionConfig, OpenAiCompletionProvider};
