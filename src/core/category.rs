//! 节点分类

/// 文本与提示词工具
pub const CATEGORY_WILDPROMPTOR: &str = "🧪AILab/🧿WildPromptor";
/// 词表节点
pub const CATEGORY_PROMPTS_LIST: &str = "🧪AILab/🧿WildPromptor/📋Prompts List";
/// 语言模型
pub const CATEGORY_AI: &str = "🧪AILab/🤖AI";
