//! 关键词选取

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use strum_macros::{Display, EnumString};

/// 选取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
pub enum KeywordPickMode {
    #[default]
    #[strum(to_string = "🎲Random")]
    Random,
    #[strum(to_string = "🔢ordered")]
    Ordered,
}

impl KeywordPickMode {
    pub fn labels() -> Vec<String> {
        vec![
            KeywordPickMode::Random.to_string(),
            KeywordPickMode::Ordered.to_string(),
        ]
    }
}

/// 合并两个来源并按逗号拆分
pub fn split_keywords(input_keywords: &str, keywords: &str) -> Vec<String> {
    [input_keywords.trim(), keywords.trim()]
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// 选取关键词, 以 `", "` 拼接
///
/// 随机模式为不放回抽样, 保持抽取顺序
pub fn pick_keywords(
    input_keywords: &str,
    keywords: &str,
    count: usize,
    mode: KeywordPickMode,
    seed: u64,
) -> String {
    let keyword_list = split_keywords(input_keywords, keywords);
    if count == 0 || keyword_list.is_empty() {
        return String::new();
    }

    let amount = count.min(keyword_list.len());
    let picked: Vec<&str> = match mode {
        KeywordPickMode::Random => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rand::seq::index::sample(&mut rng, keyword_list.len(), amount)
                .into_iter()
                .map(|i| keyword_list[i].as_str())
                .collect()
        }
        KeywordPickMode::Ordered => keyword_list[..amount].iter().map(String::as_str).collect(),
    };
    picked.join(", ")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_split_keywords() {
        let keywords = split_keywords(" cat, dog ", ",, fox ,\nowl");
        assert_eq!(keywords, vec!["cat", "dog", "fox", "owl"]);
        assert!(split_keywords("  ", "").is_empty());
    }

    #[test]
    fn test_ordered() {
        let picked = pick_keywords("cat, dog", "fox, owl", 3, KeywordPickMode::Ordered, 0);
        assert_eq!(picked, "cat, dog, fox");

        let picked = pick_keywords("cat", "", 10, KeywordPickMode::Ordered, 0);
        assert_eq!(picked, "cat");
    }

    #[test]
    fn test_random_without_replacement() {
        let source = "a, b, c, d, e, f";
        let picked = pick_keywords(source, "", 4, KeywordPickMode::Random, 7);
        let values: Vec<&str> = picked.split(", ").collect();
        assert_eq!(values.len(), 4);
        assert_eq!(values.iter().collect::<HashSet<_>>().len(), 4);

        // 相同种子结果相同
        assert_eq!(picked, pick_keywords(source, "", 4, KeywordPickMode::Random, 7));
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(pick_keywords("cat", "dog", 0, KeywordPickMode::Random, 0), "");
        assert_eq!(pick_keywords(" ", ",,", 3, KeywordPickMode::Random, 0), "");
    }
}
