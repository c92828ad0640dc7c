//! 自定义词表管理
//!
//! 只允许操作 `Custom` 目录下的 `.txt` 文件

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{info, warn};
use strum_macros::{Display, EnumString};

use crate::{
    error::Error,
    utils::encoding::read_text_auto,
    wildcard::{cache::OptionFileCache, library::option_files, option_file::parse_lines},
};

/// 未选择文件
pub const SELECT_FILE_PLACEHOLDER: &str = "<Select File>";
/// 目录中没有文件
pub const NO_FILES_PLACEHOLDER: &str = "<No Custom Files>";

const RULE: &str = "==================================================";

/// 管理操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
pub enum ListAction {
    #[default]
    #[strum(to_string = "📝 Create New List")]
    Create,
    #[strum(to_string = "✏️ Edit List (Replace All)")]
    ReplaceAll,
    #[strum(to_string = "➕ Add Line")]
    AddLine,
    #[strum(to_string = "➖ Remove Line")]
    RemoveLine,
    #[strum(to_string = "📋 View List")]
    View,
    #[strum(to_string = "🗑️ Delete List")]
    Delete,
}

impl ListAction {
    pub fn labels() -> Vec<String> {
        [
            ListAction::Create,
            ListAction::ReplaceAll,
            ListAction::AddLine,
            ListAction::RemoveLine,
            ListAction::View,
            ListAction::Delete,
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }
}

/// 管理请求
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    pub action: ListAction,
    /// 输入的文件名
    pub file_name: String,
    /// 下拉框选择的文件
    pub select_file: String,
    /// 创建或替换时的全部内容
    pub content: String,
    /// 添加或删除的行
    pub line_text: String,
}

impl ListRequest {
    /// 目标文件, 下拉框未选择时使用输入的文件名
    pub fn target_file(&self) -> &str {
        if is_placeholder(&self.select_file) || self.select_file.is_empty() {
            &self.file_name
        } else {
            &self.select_file
        }
    }
}

/// 操作结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOutcome {
    pub status: String,
    pub file_list: String,
}

fn is_placeholder(name: &str) -> bool {
    name == SELECT_FILE_PLACEHOLDER || name == NO_FILES_PLACEHOLDER
}

/// 文件名清理
///
/// 只保留字母, 数字, 空格, `-`, `_`, `.`, 并补全 `.txt` 后缀
pub fn safe_filename(name: &str) -> Result<String, Error> {
    let safe_name: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect();
    let mut safe_name = safe_name.trim().to_string();
    if !safe_name.ends_with(".txt") {
        safe_name.push_str(".txt");
    }

    let stem = safe_name.trim_end_matches(".txt").trim();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        return Err(Error::InvalidInput(
            "Please select or input filename".to_string(),
        ));
    }
    Ok(safe_name)
}

/// 非空行数
fn line_count(content: &str) -> usize {
    parse_lines(content).len()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct CustomListManager {
    root: PathBuf,
}

impl CustomListManager {
    /// 目录不存在时创建
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 目录中的词表文件名, 按名称排序
    pub fn custom_files(&self) -> Vec<String> {
        option_files(&self.root)
            .iter()
            .map(|v| display_name(v))
            .collect()
    }

    /// 下拉框选项
    pub fn file_options(&self) -> Vec<String> {
        let files = self.custom_files();
        if files.is_empty() {
            return vec![NO_FILES_PLACEHOLDER.to_string()];
        }
        let mut options = vec![SELECT_FILE_PLACEHOLDER.to_string()];
        options.extend(files);
        options
    }

    /// 文件名转换为目录中的路径
    ///
    /// 在修改任何文件之前检查路径不会逃逸出管理目录
    pub fn resolve(&self, name: &str) -> Result<PathBuf, Error> {
        if name.trim().is_empty() || is_placeholder(name) {
            return Err(Error::InvalidInput(
                "Please select or input filename".to_string(),
            ));
        }

        let safe_name = safe_filename(name)?;
        let root = fs::canonicalize(&self.root)?;
        let path = root.join(&safe_name);

        // 符号链接按最终目标检查, 目标不存在的链接直接拒绝
        let real_path = match fs::symlink_metadata(&path) {
            Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(&path) {
                Ok(v) => v,
                Err(_) => return Err(Error::PathEscape(root.to_string_lossy().to_string())),
            },
            Ok(_) => fs::canonicalize(&path)?,
            Err(_) => path.clone(),
        };
        if !real_path.starts_with(&root) || real_path.parent() != Some(root.as_path()) {
            return Err(Error::PathEscape(root.to_string_lossy().to_string()));
        }
        Ok(path)
    }

    /// 创建新词表, 文件已存在时失败
    pub fn create(&self, name: &str, content: &str) -> Result<String, Error> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("Please provide filename".to_string()));
        }
        let path = self.resolve(name)?;

        // create_new 不跟随已存在的路径, 包括符号链接
        let content = content.trim();
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(Error::FileExists(display_name(&path)));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(content.as_bytes())?;
        OptionFileCache::global().invalidate(&path);
        info!("custom list created: {}", path.display());
        Ok(format!(
            "✅ Created: {} ({} lines)",
            display_name(&path),
            line_count(content)
        ))
    }

    /// 替换全部内容, 文件不存在时失败
    pub fn replace_all(&self, name: &str, content: &str) -> Result<String, Error> {
        let path = self.existing(name)?;

        let content = content.trim();
        self.write(&path, content)?;
        Ok(format!(
            "✅ Updated: {} ({} lines)",
            display_name(&path),
            line_count(content)
        ))
    }

    /// 在末尾添加一行
    pub fn add_line(&self, name: &str, line_text: &str) -> Result<String, Error> {
        let line = line_text.trim();
        if line.is_empty() {
            return Err(Error::InvalidInput(
                "Please input content to add".to_string(),
            ));
        }
        let path = self.existing(name)?;

        let mut content = read_text_auto(&path)?;
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(line);
        content.push('\n');
        self.write(&path, &content)?;

        Ok(format!(
            "✅ Added to: {}\nContent: {line}",
            display_name(&path)
        ))
    }

    /// 删除所有与输入相同的行
    pub fn remove_line(&self, name: &str, line_text: &str) -> Result<String, Error> {
        let target = line_text.trim();
        if target.is_empty() {
            return Err(Error::InvalidInput(
                "Please input content to remove".to_string(),
            ));
        }
        let path = self.existing(name)?;

        let content = read_text_auto(&path)?;
        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        let kept: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|line| line.trim() != target)
            .collect();

        let removed = lines.len() - kept.len();
        if removed == 0 {
            warn!("line not found in {}: {target}", path.display());
            return Ok(format!("⚠️ Line not found: {target}"));
        }

        self.write(&path, &kept.concat())?;
        Ok(format!("✅ Removed {removed} line(s): {target}"))
    }

    /// 查看词表内容
    pub fn view(&self, name: &str) -> Result<String, Error> {
        let path = self.existing(name)?;
        let content = read_text_auto(&path)?;
        Ok(format!(
            "📄 {} ({} lines)\n{RULE}\n{content}",
            display_name(&path),
            line_count(&content)
        ))
    }

    /// 删除词表
    pub fn delete(&self, name: &str) -> Result<String, Error> {
        let path = self.existing(name)?;
        fs::remove_file(&path)?;
        OptionFileCache::global().invalidate(&path);
        info!("custom list deleted: {}", path.display());
        Ok(format!("🗑️ Deleted: {}", display_name(&path)))
    }

    /// 目录文件列表
    pub fn file_list_string(&self) -> String {
        let files = option_files(&self.root);
        if files.is_empty() {
            return "📁 Custom folder: (empty)\n\nTip: Use '📝 Create New List' to create your first custom list".to_string();
        }

        let mut file_list = format!("📁 Files in Custom folder:\n{RULE}\n");
        for (i, path) in files.iter().enumerate() {
            let name = display_name(path);
            match read_text_auto(path) {
                Ok(content) => {
                    file_list.push_str(&format!("{}. {name} ({} lines)\n", i + 1, line_count(&content)))
                }
                Err(_) => file_list.push_str(&format!("{}. {name}\n", i + 1)),
            }
        }
        file_list
    }

    /// 执行操作, 错误转换为状态信息
    pub fn manage(&self, request: &ListRequest) -> ListOutcome {
        let target = request.target_file();
        let result = match request.action {
            ListAction::Create => self.create(&request.file_name, &request.content),
            ListAction::ReplaceAll => self.replace_all(target, &request.content),
            ListAction::AddLine => self.add_line(target, &request.line_text),
            ListAction::RemoveLine => self.remove_line(target, &request.line_text),
            ListAction::View => self.view(target),
            ListAction::Delete => self.delete(target),
        };

        let status = match result {
            Ok(status) => status,
            Err(e) => {
                warn!("custom list {} failed, {e}", request.action);
                format!("❌ Error: {e}")
            }
        };
        ListOutcome {
            status,
            file_list: self.file_list_string(),
        }
    }

    /// 已存在的文件
    fn existing(&self, name: &str) -> Result<PathBuf, Error> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(Error::FileNotFound(display_name(&path)));
        }
        Ok(path)
    }

    /// 写入文件并清除缓存
    fn write(&self, path: &Path, content: &str) -> Result<(), Error> {
        fs::write(path, content)?;
        OptionFileCache::global().invalidate(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> anyhow::Result<(tempfile::TempDir, CustomListManager)> {
        let dir = tempfile::tempdir()?;
        let manager = CustomListManager::new(dir.path().join("Custom"))?;
        Ok((dir, manager))
    }

    #[test]
    fn test_safe_filename() -> anyhow::Result<()> {
        assert_eq!(safe_filename("My_Custom_List")?, "My_Custom_List.txt");
        assert_eq!(safe_filename(" colors.txt ")?, "colors.txt");
        assert_eq!(safe_filename("../../etc/passwd")?, "....etcpasswd.txt");
        assert_eq!(safe_filename("a<b>:c?")?, "abc.txt");
        assert!(safe_filename("///").is_err());
        assert!(safe_filename(".txt").is_err());
        assert!(safe_filename("..").is_err());
        Ok(())
    }

    #[test]
    fn test_resolve_stays_in_root() -> anyhow::Result<()> {
        let (_dir, manager) = manager()?;
        let root = fs::canonicalize(manager.root())?;

        let path = manager.resolve("../outside")?;
        assert_eq!(path.parent(), Some(root.as_path()));

        assert!(manager.resolve(SELECT_FILE_PLACEHOLDER).is_err());
        assert!(manager.resolve("  ").is_err());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_escape() -> anyhow::Result<()> {
        let (dir, manager) = manager()?;
        let outside = dir.path().join("outside.txt");
        fs::write(&outside, "secret\n")?;
        std::os::unix::fs::symlink(&outside, manager.root().join("link.txt"))?;

        let result = manager.resolve("link");
        assert!(matches!(result, Err(Error::PathEscape(_))));

        let outcome = manager.manage(&ListRequest {
            action: ListAction::ReplaceAll,
            file_name: "link".to_string(),
            content: "overwritten".to_string(),
            ..Default::default()
        });
        assert!(outcome.status.starts_with("❌ Error:"));
        assert_eq!(fs::read_to_string(&outside)?, "secret\n");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_dangling_symlink() -> anyhow::Result<()> {
        let (dir, manager) = manager()?;
        let outside = dir.path().join("outside_created.txt");
        std::os::unix::fs::symlink(&outside, manager.root().join("dangling.txt"))?;

        assert!(matches!(manager.resolve("dangling"), Err(Error::PathEscape(_))));

        for action in [ListAction::Create, ListAction::ReplaceAll, ListAction::AddLine] {
            let outcome = manager.manage(&ListRequest {
                action,
                file_name: "dangling".to_string(),
                content: "overwritten".to_string(),
                line_text: "overwritten".to_string(),
                ..Default::default()
            });
            assert!(outcome.status.starts_with("❌ Error:"), "{action}: {}", outcome.status);
        }
        assert!(!outside.exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_allows_symlink_inside_root() -> anyhow::Result<()> {
        let (_dir, manager) = manager()?;
        manager.create("colors", "red")?;
        std::os::unix::fs::symlink(
            manager.root().join("colors.txt"),
            manager.root().join("alias.txt"),
        )?;

        let root = fs::canonicalize(manager.root())?;
        assert_eq!(manager.resolve("alias")?, root.join("alias.txt"));
        assert!(matches!(manager.create("alias", "x"), Err(Error::FileExists(_))));
        Ok(())
    }

    #[test]
    fn test_create_and_view() -> anyhow::Result<()> {
        let (_dir, manager) = manager()?;

        let status = manager.create("colors", "\nred\ngreen\n\nblue\n")?;
        assert_eq!(status, "✅ Created: colors.txt (3 lines)");
        assert_eq!(fs::read_to_string(manager.root().join("colors.txt"))?, "red\ngreen\n\nblue");

        assert!(matches!(
            manager.create("colors", "x"),
            Err(Error::FileExists(_))
        ));
        assert!(manager.create(" ", "x").is_err());

        let view = manager.view("colors.txt")?;
        assert!(view.starts_with("📄 colors.txt (3 lines)\n"));
        assert!(view.ends_with("red\ngreen\n\nblue"));
        Ok(())
    }

    #[test]
    fn test_replace_all() -> anyhow::Result<()> {
        let (_dir, manager) = manager()?;
        assert!(matches!(
            manager.replace_all("missing", "x"),
            Err(Error::FileNotFound(_))
        ));

        manager.create("colors", "red")?;
        let status = manager.replace_all("colors", " cyan\nmagenta \n")?;
        assert_eq!(status, "✅ Updated: colors.txt (2 lines)");
        assert_eq!(fs::read_to_string(manager.root().join("colors.txt"))?, "cyan\nmagenta");
        Ok(())
    }

    #[test]
    fn test_add_and_remove_line() -> anyhow::Result<()> {
        let (_dir, manager) = manager()?;
        manager.create("colors", "red\ngreen")?;

        manager.add_line("colors", "  blue ")?;
        manager.add_line("colors", "red")?;
        let path = manager.root().join("colors.txt");
        assert_eq!(fs::read_to_string(&path)?, "red\ngreen\nblue\nred\n");
        assert!(manager.add_line("colors", "  ").is_err());

        let status = manager.remove_line("colors", " red ")?;
        assert_eq!(status, "✅ Removed 2 line(s): red");
        assert_eq!(fs::read_to_string(&path)?, "green\nblue\n");

        let status = manager.remove_line("colors", "purple")?;
        assert_eq!(status, "⚠️ Line not found: purple");
        Ok(())
    }

    #[test]
    fn test_delete() -> anyhow::Result<()> {
        let (_dir, manager) = manager()?;
        manager.create("colors", "red")?;
        assert_eq!(manager.delete("colors")?, "🗑️ Deleted: colors.txt");
        assert!(!manager.root().join("colors.txt").exists());
        assert!(manager.delete("colors").is_err());
        Ok(())
    }

    #[test]
    fn test_manage() -> anyhow::Result<()> {
        let (_dir, manager) = manager()?;
        assert_eq!(manager.file_options(), vec![NO_FILES_PLACEHOLDER]);

        let outcome = manager.manage(&ListRequest {
            action: ListAction::Create,
            file_name: "b_list".to_string(),
            content: "one\ntwo".to_string(),
            ..Default::default()
        });
        assert_eq!(outcome.status, "✅ Created: b_list.txt (2 lines)");
        manager.create("a_list", "x")?;

        // 下拉框选择优先于输入的文件名
        let outcome = manager.manage(&ListRequest {
            action: ListAction::AddLine,
            file_name: "unused".to_string(),
            select_file: "b_list.txt".to_string(),
            line_text: "three".to_string(),
            ..Default::default()
        });
        assert!(outcome.status.starts_with("✅ Added to: b_list.txt"));
        assert_eq!(
            outcome.file_list,
            format!("📁 Files in Custom folder:\n{RULE}\n1. a_list.txt (1 lines)\n2. b_list.txt (3 lines)\n")
        );
        assert_eq!(
            manager.file_options(),
            vec![SELECT_FILE_PLACEHOLDER, "a_list.txt", "b_list.txt"]
        );

        let outcome = manager.manage(&ListRequest {
            action: ListAction::View,
            select_file: SELECT_FILE_PLACEHOLDER.to_string(),
            ..Default::default()
        });
        assert_eq!(outcome.status, "❌ Error: Please select or input filename");
        Ok(())
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(ListAction::labels().len(), 6);
        assert_eq!(
            "➖ Remove Line".parse::<ListAction>().ok(),
            Some(ListAction::RemoveLine)
        );
    }
}
