//! 提示词模板

use strum_macros::{Display, EnumString};

/// 回复语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
pub enum Language {
    #[default]
    Auto,
    English,
    Chinese,
    Japanese,
    Korean,
}

impl Language {
    pub fn labels() -> Vec<String> {
        [
            Language::Auto,
            Language::English,
            Language::Chinese,
            Language::Japanese,
            Language::Korean,
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }

    /// 加在提示词前的语言要求
    pub fn prefix(&self) -> &'static str {
        match self {
            Language::Auto => "",
            Language::English => "Please respond in English: ",
            Language::Chinese => "请用中文回答: ",
            Language::Japanese => "日本語で答えてください: ",
            Language::Korean => "한국어로 답변해주세요: ",
        }
    }

    pub fn apply(&self, text: &str) -> String {
        format!("{}{text}", self.prefix())
    }
}

/// 由关键词生成一段图像描述
pub fn format_prompt(keywords: &str) -> String {
    format!(
        "Based on these keywords: {keywords}\nCreate a single, concise paragraph describing an image. Focus only on the visual elements without mentioning prompt creation or image generation. Avoid sections, bullet points, or style suggestions."
    )
}

/// 图片分析, 关键词可为空
pub fn format_image_prompt(keywords: &str) -> String {
    if keywords.trim().is_empty() {
        return "Describe the image in detail, focusing on visual elements, colors, composition, and any notable objects or features. Provide a comprehensive description without using phrases like 'The image shows' or 'The image contains'.".to_string();
    }
    format!(
        "Analyze the image based on these keywords and questions: {keywords}. Describe the image in detail, focusing on visual elements, colors, composition, and any notable objects or features. Also, specifically address any questions or points mentioned in the keywords. Provide a comprehensive description without using phrases like 'The image shows' or 'The image contains'."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language() {
        assert_eq!(Language::Auto.apply("hi"), "hi");
        assert_eq!(Language::Chinese.apply("hi"), "请用中文回答: hi");
        assert_eq!("Korean".parse::<Language>().ok(), Some(Language::Korean));
        assert_eq!(Language::labels()[0], "Auto");
    }

    #[test]
    fn test_templates() {
        assert!(format_prompt("fox, snow").starts_with("Based on these keywords: fox, snow\n"));
        assert!(format_image_prompt("what color?")
            .starts_with("Analyze the image based on these keywords and questions: what color?."));
        assert!(format_image_prompt("  ").starts_with("Describe the image in detail"));
    }
}
