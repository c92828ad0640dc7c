//! 词表文件解析
//!
//! 每行一个选项:
//! - `Title - Content`: 以第一个 `" - "` 分隔, 标题用于下拉框显示, 内容用于生成提示词
//! - 其他: 标题与内容相同
//!
//! 空行忽略

/// 标题与内容的分隔符
pub const TITLE_SEPARATOR: &str = " - ";

/// 行解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineFormat {
    /// 支持 `Title - Content`
    Titled,
    /// 整行即选项
    Plain,
}

/// 词表选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub title: String,
    pub content: String,
}

impl OptionEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// 标题与内容相同的选项
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            title: value.clone(),
            content: value,
        }
    }

    /// 解析单行, 调用方需保证行已去除首尾空白
    pub fn parse(line: &str, format: LineFormat) -> Self {
        match format {
            LineFormat::Titled => match line.split_once(TITLE_SEPARATOR) {
                Some((title, content)) => Self::new(title, content),
                None => Self::plain(line),
            },
            LineFormat::Plain => Self::plain(line),
        }
    }
}

/// 去除首尾空白并过滤空行
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 行列表转换为选项
pub fn parse_entries(lines: &[String], format: LineFormat) -> Vec<OptionEntry> {
    lines
        .iter()
        .map(|line| OptionEntry::parse(line, format))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        let lines = parse_lines("  red \n\n\t\nBlue - deep blue sky\r\n  green");
        assert_eq!(lines, vec!["red", "Blue - deep blue sky", "green"]);
    }

    #[test]
    fn test_titled_entry_splits_on_first_separator() {
        let entry = OptionEntry::parse("Sunset - orange sky - warm light", LineFormat::Titled);
        assert_eq!(entry.title, "Sunset");
        assert_eq!(entry.content, "orange sky - warm light");

        let entry = OptionEntry::parse("red-orange", LineFormat::Titled);
        assert_eq!(entry, OptionEntry::plain("red-orange"));
    }

    #[test]
    fn test_plain_entry_keeps_whole_line() {
        let entry = OptionEntry::parse("Sunset - orange sky", LineFormat::Plain);
        assert_eq!(entry.title, "Sunset - orange sky");
        assert_eq!(entry.content, "Sunset - orange sky");
    }
}
