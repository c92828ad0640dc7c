//! 提示词拼接

use std::collections::HashSet;

use strum_macros::{Display, EnumString};

/// 拼接分隔符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
pub enum Separator {
    #[default]
    #[strum(to_string = "comma")]
    Comma,
    #[strum(to_string = "space")]
    Space,
    #[strum(to_string = "newline")]
    Newline,
}

impl Separator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Comma => ", ",
            Separator::Space => " ",
            Separator::Newline => "\n",
        }
    }

    /// 下拉框选项
    pub fn labels() -> Vec<String> {
        vec![
            Separator::Comma.to_string(),
            Separator::Space.to_string(),
            Separator::Newline.to_string(),
        ]
    }
}

/// 拼接选项
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatOptions {
    pub separator: Separator,
    pub remove_duplicates: bool,
    pub sort: bool,
}

/// 拼接前缀, 各字段与后缀
///
/// 所有部分去除首尾空白后忽略空值。
/// 排序时只对中间部分排序, 前缀保持在最前, 后缀保持在最后。
pub fn concat_prompt<S: AsRef<str>>(
    prefix: &str,
    fields: &[S],
    suffix: &str,
    options: &ConcatOptions,
) -> String {
    let prefix = prefix.trim();
    let suffix = suffix.trim();

    let mut body: Vec<&str> = fields
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !v.is_empty())
        .collect();

    let mut head = (!prefix.is_empty()).then_some(prefix);
    let mut tail = (!suffix.is_empty()).then_some(suffix);

    if options.remove_duplicates {
        // 保留第一次出现的位置
        let mut seen = HashSet::new();
        head = head.filter(|v| seen.insert(*v));
        body.retain(|v| seen.insert(*v));
        tail = tail.filter(|v| seen.insert(*v));
    }

    if options.sort {
        body.sort_unstable();
    }

    let parts: Vec<&str> = head.into_iter().chain(body).chain(tail).collect();
    parts.join(options.separator.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_skips_blank_parts() {
        let fields = ["  cat ", "", "   ", "dog"];
        let prompt = concat_prompt(" photo ", &fields, "", &ConcatOptions::default());
        assert_eq!(prompt, "photo, cat, dog");

        let empty: [&str; 0] = [];
        assert_eq!(concat_prompt("  ", &empty, "\n", &ConcatOptions::default()), "");
    }

    #[test]
    fn test_separator() {
        let fields = ["a", "b"];
        for (separator, expected) in [
            (Separator::Comma, "a, b"),
            (Separator::Space, "a b"),
            (Separator::Newline, "a\nb"),
        ] {
            let options = ConcatOptions {
                separator,
                ..Default::default()
            };
            assert_eq!(concat_prompt("", &fields, "", &options), expected);
        }
        assert_eq!("newline".parse::<Separator>().ok(), Some(Separator::Newline));
    }

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let fields = ["cat", "dog", "cat", "photo"];
        let options = ConcatOptions {
            remove_duplicates: true,
            ..Default::default()
        };
        assert_eq!(concat_prompt("photo", &fields, "dog", &options), "photo, cat, dog");
    }

    #[test]
    fn test_sort_keeps_prefix_and_suffix() {
        let fields = ["zebra", "apple", "mango"];
        let options = ConcatOptions {
            sort: true,
            ..Default::default()
        };
        assert_eq!(
            concat_prompt("masterpiece", &fields, "8k", &options),
            "masterpiece, apple, mango, zebra, 8k"
        );
        // 没有前缀时不会把第一个字段当作前缀
        assert_eq!(concat_prompt("", &fields, "", &options), "apple, mango, zebra");
    }
}
