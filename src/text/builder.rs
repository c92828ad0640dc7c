//! 按行构建提示词

/// 按行构建的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompts {
    /// 每个非空行一个提示词, 至少包含一个元素
    pub prompts: Vec<String>,
    /// 原始内容
    pub content: String,
}

/// 为内容的每个非空行加上前缀与后缀
///
/// 结果去除首尾的逗号与空格, 前缀或后缀为空时不会留下多余的分隔符。
pub fn build_prompts(prefix: &str, content: &str, suffix: &str) -> BuiltPrompts {
    let prompts: Vec<String> = content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            format!("{prefix}, {line}, {suffix}")
                .trim_matches(|c| c == ',' || c == ' ')
                .to_string()
        })
        .collect();

    BuiltPrompts {
        prompts: if prompts.is_empty() {
            vec![String::new()]
        } else {
            prompts
        },
        content: content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompts() {
        let built = build_prompts("masterpiece", "a cat\n\n  \na dog", "8k");
        assert_eq!(built.prompts, vec!["masterpiece, a cat, 8k", "masterpiece, a dog, 8k"]);
        assert_eq!(built.content, "a cat\n\n  \na dog");
    }

    #[test]
    fn test_build_without_prefix_and_suffix() {
        let built = build_prompts("", "a cat", "");
        assert_eq!(built.prompts, vec!["a cat"]);

        let built = build_prompts("", "a cat", "8k");
        assert_eq!(built.prompts, vec!["a cat, 8k"]);
    }

    #[test]
    fn test_empty_content() {
        let built = build_prompts("masterpiece", " \n ", "8k");
        assert_eq!(built.prompts, vec![""]);
    }
}
