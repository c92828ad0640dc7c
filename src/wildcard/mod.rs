//! 词表与提示词采样
pub mod cache;
pub mod category;
pub mod library;
pub mod mode;
pub mod option_file;
pub mod sampler;

pub use category::Category;
pub use library::WildcardLibrary;
pub use mode::{PickMode, SelectionMode};
pub use sampler::{BatchRequest, PromptSampler, Selection};
