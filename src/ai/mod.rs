//! 语言模型后端与提示词模板
pub mod backend;
pub mod ollama;
pub mod prompts;

pub use backend::{GenerationOptions, GenerationRequest, TextGenerator};
pub use ollama::OllamaClient;
pub use prompts::{format_image_prompt, format_prompt, Language};
