//! 词表库
//!
//! 数据目录下的每个子目录对应一个列表节点, 子目录中的每个 `.txt` 文件对应一个分类。

use std::path::{Path, PathBuf};

use log::warn;
use walkdir::{DirEntry, WalkDir};

use crate::{
    config::Config,
    wildcard::{
        cache::OptionFileCache,
        category::{folder_display_key, Category},
        option_file::LineFormat,
    },
};

/// 扫描时忽略的目录
const EXCLUDED_DIR_NAMES: &[&str] = &["__pycache__"];

/// 词表文件扩展名
const OPTION_FILE_EXTENSION: &str = "txt";

#[derive(Debug, Clone)]
pub struct WildcardLibrary {
    data_path: PathBuf,
    folders: Vec<String>,
}

impl WildcardLibrary {
    pub fn new(data_path: impl Into<PathBuf>, folders: Vec<String>) -> Self {
        Self {
            data_path: data_path.into(),
            folders,
        }
    }

    /// 由插件配置创建
    pub fn from_config(config: &Config, root: &Path) -> Self {
        Self::new(config.data_dir(root), config.folders.clone())
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// 数据目录下的子目录, 按名称排序
    pub fn subfolders(&self) -> Vec<String> {
        if !self.data_path.is_dir() {
            warn!("data directory not found: {}", self.data_path.display());
            return Vec::new();
        }

        single_level(&self.data_path)
            .filter(|e| e.file_type().is_dir() && !is_excluded_dir(e))
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect()
    }

    /// 单个目录下的分类, 支持 `Title - Content`
    pub fn folder_categories(&self, folder: &str) -> Vec<Category> {
        self.folder_categories_with(folder, OptionFileCache::global())
    }

    pub fn folder_categories_with(&self, folder: &str, cache: &OptionFileCache) -> Vec<Category> {
        option_files(&self.data_path.join(folder))
            .iter()
            .map(|path| Category::load(path, LineFormat::Titled, cache))
            .collect()
    }

    /// 所有配置目录中的分类, 整行即选项
    pub fn all_categories(&self) -> Vec<Category> {
        self.all_categories_with(OptionFileCache::global())
    }

    pub fn all_categories_with(&self, cache: &OptionFileCache) -> Vec<Category> {
        let mut categories = Vec::new();
        for folder in self.concat_folders() {
            for path in option_files(&self.data_path.join(&folder)) {
                let category = Category::load(&path, LineFormat::Plain, cache);
                let key = folder_display_key(&folder, &category.name, category.len());
                categories.push(category.with_key(key));
            }
        }
        categories
    }

    /// 配置中存在于磁盘上的目录
    pub fn concat_folders(&self) -> Vec<String> {
        self.folders
            .iter()
            .filter(|folder| self.data_path.join(folder).is_dir())
            .cloned()
            .collect()
    }
}

/// 单层目录项, 按文件名排序
fn single_level(dir: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
}

/// 检查是否为排除目录
fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| EXCLUDED_DIR_NAMES.contains(&name))
        .unwrap_or(false)
}

/// 词表节点的 class 名称, 首字母大写其余小写
///
/// `scene` -> `Scene 📋`
pub fn node_class_name(folder: &str) -> String {
    let mut chars = folder.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };
    format!("{capitalized} 📋")
}

/// 目录下的词表文件, 按文件名排序
pub fn option_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    single_level(dir)
        .filter(|e| e.file_type().is_file())
        .map(DirEntry::into_path)
        .filter(|path| is_option_file(path))
        .collect()
}

fn is_option_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext == OPTION_FILE_EXTENSION)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, fs};

    use super::*;
    use crate::{
        custom_list::CustomListManager,
        wildcard::sampler::{BatchRequest, PromptSampler, Selection},
    };

    fn fixture() -> anyhow::Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        let scene = dir.path().join("Scene");
        let style = dir.path().join("Style");
        fs::create_dir_all(&scene)?;
        fs::create_dir_all(&style)?;
        fs::create_dir_all(dir.path().join("__pycache__"))?;

        fs::write(scene.join("02.Lighting.txt"), "Golden - golden hour light\nneon glow\n")?;
        fs::write(scene.join("01.Color.txt"), "red\ngreen\nblue\n")?;
        fs::write(scene.join("notes.md"), "not an option file")?;
        fs::write(style.join("Medium.txt"), "oil painting\n")?;
        Ok(dir)
    }

    #[test]
    fn test_subfolders() -> anyhow::Result<()> {
        let dir = fixture()?;
        let library = WildcardLibrary::new(dir.path(), vec![]);
        assert_eq!(library.subfolders(), vec!["Scene", "Style"]);
        Ok(())
    }

    #[test]
    fn test_folder_categories() -> anyhow::Result<()> {
        let dir = fixture()?;
        let library = WildcardLibrary::new(dir.path(), vec![]);

        let categories = library.folder_categories_with("Scene", &OptionFileCache::new());
        let keys: Vec<&str> = categories.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, vec!["Color [3]", "Lighting [2]"]);
        assert_eq!(categories[1].titles(), vec!["Golden", "neon glow"]);
        Ok(())
    }

    #[test]
    fn test_all_categories() -> anyhow::Result<()> {
        let dir = fixture()?;
        let folders = vec!["Style".to_string(), "Missing".to_string(), "Scene".to_string()];
        let library = WildcardLibrary::new(dir.path(), folders);

        assert_eq!(library.concat_folders(), vec!["Style", "Scene"]);

        let categories = library.all_categories_with(&OptionFileCache::new());
        let keys: Vec<&str> = categories.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["Style - Medium [1]", "Scene - Color [3]", "Scene - Lighting [2]"]
        );
        // 整行即选项
        assert_eq!(categories[2].contents(), vec!["Golden - golden hour light", "neon glow"]);
        Ok(())
    }

    #[test]
    fn test_option_file_extension_is_case_sensitive() -> anyhow::Result<()> {
        let dir = fixture()?;
        let scene = dir.path().join("Scene");
        fs::write(scene.join("03.Mood.TXT"), "calm\n")?;

        let names: Vec<String> = option_files(&scene)
            .iter()
            .filter_map(|v| v.file_name().map(|v| v.to_string_lossy().to_string()))
            .collect();
        assert_eq!(names, vec!["01.Color.txt", "02.Lighting.txt"]);
        Ok(())
    }

    #[test]
    fn test_widget_values_survive_list_edit() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let manager = CustomListManager::new(dir.path().join("Custom"))?;
        manager.create("Mine", "a\nb")?;
        let library = WildcardLibrary::new(dir.path(), vec!["Custom".to_string()]);

        // 节点输入按编辑前的行数生成
        let keys: Vec<String> = library
            .folder_categories_with("Custom", &OptionFileCache::new())
            .into_iter()
            .map(|v| v.key)
            .collect();
        assert_eq!(keys, vec!["Mine [2]"]);
        let widgets = HashMap::from([(keys[0].clone(), "🔢ordered".to_string())]);

        manager.add_line("Mine", "c")?;

        let categories = library.folder_categories_with("Custom", &OptionFileCache::new());
        assert_eq!(categories[0].key, "Mine [3]");
        let selections = Selection::from_widgets(&categories, &widgets);
        let prompts = PromptSampler::new().sample(&selections, &BatchRequest::new(3, 0, false));
        assert_eq!(prompts, vec!["a", "b", "c"]);

        let all = library.all_categories_with(&OptionFileCache::new());
        let widgets = HashMap::from([("Custom - Mine [2]".to_string(), "b".to_string())]);
        let selections = Selection::from_widgets(&all, &widgets);
        assert_eq!(PromptSampler::new().sample(&selections, &BatchRequest::default()), vec!["b"]);
        Ok(())
    }

    #[test]
    fn test_node_class_name() {
        assert_eq!(node_class_name("scene"), "Scene 📋");
        assert_eq!(node_class_name("CHARACTER"), "Character 📋");
        assert_eq!(node_class_name(""), " 📋");
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            data_path: "lists".to_string(),
            folders: vec!["Scene".to_string()],
            ..Default::default()
        };
        let library = WildcardLibrary::from_config(&config, Path::new("/plugin"));
        assert_eq!(library.data_path(), Path::new("/plugin/lists"));
    }

    #[test]
    fn test_missing_data_path() {
        let library = WildcardLibrary::new("/nonexistent/wildpromptor", vec!["Scene".to_string()]);
        assert!(library.subfolders().is_empty());
        assert!(library.all_categories_with(&OptionFileCache::new()).is_empty());
    }
}
