pub mod openai;

pub use openai::{fallback_answer, LlmAnswerer};
