//! 文本处理
pub mod builder;
pub mod clean;
pub mod concat;
pub mod keyword_picker;
pub mod workflow;

pub use builder::{build_prompts, BuiltPrompts};
pub use clean::clean_prompt;
pub use concat::{concat_prompt, ConcatOptions, Separator};
pub use keyword_picker::{pick_keywords, KeywordPickMode};
pub use workflow::apply_widget_values;
