//! 词表分类
//!
//! 一个 `.txt` 文件对应一个分类

use std::path::Path;

use crate::wildcard::{
    cache::OptionFileCache,
    option_file::{parse_entries, LineFormat, OptionEntry},
};

/// 词表分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// 节点输入名称, 如 `Color [3]`
    pub key: String,
    /// 清理后的名称, 如 `Color`
    pub name: String,
    pub options: Vec<OptionEntry>,
}

impl Category {
    pub fn new(key: impl Into<String>, name: impl Into<String>, options: Vec<OptionEntry>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            options,
        }
    }

    /// 由内容列表创建, 标题与内容相同
    pub fn from_values<I, S>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<OptionEntry> = values.into_iter().map(OptionEntry::plain).collect();
        Self::new(display_key(name, options.len()), name, options)
    }

    /// 从词表文件加载, 读取失败时为空分类
    pub fn load(path: &Path, format: LineFormat, cache: &OptionFileCache) -> Self {
        let name = path
            .file_stem()
            .map(|v| clean_name(&v.to_string_lossy()))
            .unwrap_or_default();
        let lines = cache.lines_or_empty(path);
        let options = parse_entries(&lines, format);
        Self::new(display_key(&name, options.len()), name, options)
    }

    /// 替换输入名称
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn titles(&self) -> Vec<String> {
        self.options.iter().map(|v| v.title.clone()).collect()
    }

    pub fn contents(&self) -> Vec<&str> {
        self.options.iter().map(|v| v.content.as_str()).collect()
    }

    /// 按标题查找内容
    pub fn content_by_title(&self, title: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|v| v.title == title)
            .map(|v| v.content.as_str())
    }
}

/// 去除文件名中第一个 `.` 之前的排序前缀
///
/// `01.Color` -> `Color`
pub fn clean_name(stem: &str) -> String {
    match stem.split_once('.') {
        Some((_, rest)) => rest.to_string(),
        None => stem.to_string(),
    }
}

/// 节点输入名称
pub fn display_key(name: &str, count: usize) -> String {
    format!("{name} [{count}]")
}

/// 去除输入名称末尾的 ` [n]` 数量后缀
///
/// 数量随词表编辑变化, 匹配节点输入时只比较名称部分
pub fn key_base(key: &str) -> &str {
    match key.rsplit_once(" [") {
        Some((base, count))
            if count
                .strip_suffix(']')
                .is_some_and(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit())) =>
        {
            base
        }
        _ => key,
    }
}

/// All-in-One 节点的输入名称
pub fn folder_display_key(folder: &str, name: &str, count: usize) -> String {
    format!("{folder} - {name} [{count}]")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("01.Color"), "Color");
        assert_eq!(clean_name("a.b.c"), "b.c");
        assert_eq!(clean_name("Color"), "Color");
    }

    #[test]
    fn test_load_titled() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("02.Lighting.txt");
        fs::write(&path, "Golden - golden hour light\nneon glow\n\n")?;

        let category = Category::load(&path, LineFormat::Titled, &OptionFileCache::new());
        assert_eq!(category.name, "Lighting");
        assert_eq!(category.key, "Lighting [2]");
        assert_eq!(category.titles(), vec!["Golden", "neon glow"]);
        assert_eq!(category.content_by_title("Golden"), Some("golden hour light"));
        assert_eq!(category.content_by_title("golden hour light"), None);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let category = Category::load(
            Path::new("/nonexistent/wildpromptor/01.Pose.txt"),
            LineFormat::Titled,
            &OptionFileCache::new(),
        );
        assert!(category.is_empty());
        assert_eq!(category.key, "Pose [0]");
    }

    #[test]
    fn test_key_base() {
        assert_eq!(key_base("Color [3]"), "Color");
        assert_eq!(key_base("Scene - Color [12]"), "Scene - Color");
        assert_eq!(key_base("Set [a] [2]"), "Set [a]");
        assert_eq!(key_base("Color"), "Color");
        assert_eq!(key_base("Color [x]"), "Color [x]");
    }

    #[test]
    fn test_keys() {
        assert_eq!(display_key("Color", 3), "Color [3]");
        assert_eq!(folder_display_key("Scene", "Color", 3), "Scene - Color [3]");
        let category = Category::from_values("Color", ["red", "green"]);
        assert_eq!(category.key, "Color [2]");
        assert_eq!(category.contents(), vec!["red", "green"]);
    }
}
