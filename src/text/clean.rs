//! 清理模型生成的提示词

use lazy_static::lazy_static;
use regex::Regex;

/// 需要移除的套话
const UNWANTED_PHRASES: &[&str] = &[
    "style",
    "additional detail",
    "artistic style",
    "optional details",
    "generate an image of",
    "image description:",
    "the image displayed is",
    "the image shows",
    "in this image",
    "the scene depicts",
    "this image portrays",
    "visualize a scene where",
    "the photograph shows",
    "the picture displays",
    "we can see",
    "visible in the image",
];

lazy_static! {
    static ref LEADING_PHRASE: Regex = Regex::new(
        r"(?i)^(The (image|picture|photo|scene|snapshot) (is|shows|displays|depicts|contains|features|presents|captures|portrays|reveals))\s*"
    )
    .expect("leading phrase pattern");
    static ref HEADING_LINE: Regex = Regex::new(r"(?m)^.*?:\n").expect("heading pattern");
    static ref ASTERISKS: Regex = Regex::new(r"\*+").expect("asterisk pattern");
    static ref UNWANTED: Regex = Regex::new(&format!(
        r"(?i)\b({})\b",
        UNWANTED_PHRASES
            .iter()
            .map(|v| regex::escape(v))
            .collect::<Vec<_>>()
            .join("|")
    ))
    .expect("unwanted phrases pattern");
}

/// 清理提示词
///
/// 1. 去除开头的 "The image shows" 一类描述
/// 2. 去除以 `:` 结尾的标题行
/// 3. 去除 `*`
/// 4. 合并空白
/// 5. 去除套话
pub fn clean_prompt(text: &str) -> String {
    let text = LEADING_PHRASE.replace(text, "");
    let text = HEADING_LINE.replace_all(&text, "");
    let text = ASTERISKS.replace_all(&text, "");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = UNWANTED.replace_all(&text, "");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_phrase() {
        assert_eq!(clean_prompt("The image shows a red fox"), "a red fox");
        assert_eq!(clean_prompt("the PHOTO depicts  a lake"), "a lake");
        // 只处理开头
        assert_eq!(clean_prompt("A fox. The photo reveals"), "A fox. The photo reveals");
    }

    #[test]
    fn test_heading_and_markdown() {
        let text = "Description:\nA **red** fox\n\nin   the snow";
        assert_eq!(clean_prompt(text), "A red fox in the snow");
    }

    #[test]
    fn test_unwanted_phrases() {
        assert_eq!(clean_prompt("In this image a fox sits"), "a fox sits");
        // 整词匹配
        assert_eq!(clean_prompt("styles of fox"), "styles of fox");
    }
}
