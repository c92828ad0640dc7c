//! 插件配置
//!
//! - config.json: 词表目录与文件夹
//! - config_ai.json: 语言模型后端

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// 插件目录名称
pub const PLUGIN_DIR_NAME: &str = "ComfyUI-WildPromptor";
/// 插件目录环境变量
pub const PLUGIN_ROOT_ENV: &str = "WILDPROMPTOR_ROOT";

pub const CONFIG_FILE: &str = "config.json";
pub const AI_CONFIG_FILE: &str = "config_ai.json";

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

static PLUGIN_ROOT: OnceLock<PathBuf> = OnceLock::new();
static CONFIG: OnceLock<Config> = OnceLock::new();
static AI_CONFIG: OnceLock<AiConfig> = OnceLock::new();

/// 设置插件根目录, 仅首次调用生效
pub fn set_plugin_root(path: impl Into<PathBuf>) -> bool {
    PLUGIN_ROOT.set(path.into()).is_ok()
}

/// 插件根目录
///
/// 优先级: set_plugin_root > WILDPROMPTOR_ROOT > {cwd}/custom_nodes/ComfyUI-WildPromptor
pub fn plugin_root() -> &'static Path {
    PLUGIN_ROOT.get_or_init(|| {
        if let Ok(root) = std::env::var(PLUGIN_ROOT_ENV) {
            return PathBuf::from(root);
        }
        std::env::current_dir()
            .unwrap_or_default()
            .join("custom_nodes")
            .join(PLUGIN_DIR_NAME)
    })
}

fn default_data_path() -> String {
    "data".to_string()
}

fn default_custom_folder() -> String {
    "Custom".to_string()
}

/// config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 词表根目录, 相对于插件根目录
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// 拼接节点与 All-in-One 节点使用的文件夹
    #[serde(default)]
    pub folders: Vec<String>,
    /// 自定义词表文件夹
    #[serde(default = "default_custom_folder")]
    pub custom_folder: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            folders: Vec::new(),
            custom_folder: default_custom_folder(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 读取失败时使用默认配置
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);
        match Self::load(&path) {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("config load failed, path: {}, {e}", path.display());
                Self::default()
            }
        }
    }

    /// 进程内只加载一次
    pub fn global() -> &'static Config {
        CONFIG.get_or_init(|| Self::load_or_default(plugin_root()))
    }

    /// 词表目录的绝对路径
    pub fn data_dir(&self, root: &Path) -> PathBuf {
        let data_path = Path::new(&self.data_path);
        if data_path.is_absolute() {
            data_path.to_path_buf()
        } else {
            root.join(data_path)
        }
    }

    pub fn custom_dir(&self, root: &Path) -> PathBuf {
        self.data_dir(root).join(&self.custom_folder)
    }
}

fn default_ollama_url() -> String {
    DEFAULT_OLLAMA_URL.to_string()
}

/// config_ai.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,
    /// 可选模型列表
    #[serde(default, alias = "HFGPT_repos")]
    pub models: Vec<String>,
    #[serde(default)]
    pub default_model: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            ollama_url: default_ollama_url(),
            models: Vec::new(),
            default_model: None,
        }
    }
}

impl AiConfig {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(AI_CONFIG_FILE);
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("ai config load failed, path: {}, {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn global() -> &'static AiConfig {
        AI_CONFIG.get_or_init(|| Self::load_or_default(plugin_root()))
    }

    /// 节点下拉框中的模型, 未配置时给出占位项
    pub fn model_choices(&self) -> Vec<String> {
        if self.models.is_empty() {
            return vec!["No models found".to_string()];
        }
        self.models.clone()
    }

    pub fn preferred_model(&self) -> String {
        self.default_model
            .clone()
            .or_else(|| self.models.first().cloned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() -> anyhow::Result<()> {
        let config: Config = serde_json::from_str(r#"{"folders": ["Character"]}"#)?;
        assert_eq!(config.data_path, "data");
        assert_eq!(config.custom_folder, "Custom");
        assert_eq!(config.folders, vec!["Character".to_string()]);
        Ok(())
    }

    #[test]
    fn test_config_load_or_default() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        assert_eq!(Config::load_or_default(dir.path()), Config::default());

        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"data_path": "lists", "folders": ["A", "B"]}"#,
        )?;
        let config = Config::load_or_default(dir.path());
        assert_eq!(config.data_dir(dir.path()), dir.path().join("lists"));
        assert_eq!(config.custom_dir(dir.path()), dir.path().join("lists").join("Custom"));
        Ok(())
    }

    #[test]
    fn test_ai_config_legacy_key() -> anyhow::Result<()> {
        let config: AiConfig = serde_json::from_str(r#"{"HFGPT_repos": ["llama3.2"]}"#)?;
        assert_eq!(config.ollama_url, DEFAULT_OLLAMA_URL);
        assert_eq!(config.model_choices(), vec!["llama3.2".to_string()]);
        assert_eq!(config.preferred_model(), "llama3.2");

        let empty = AiConfig::default();
        assert_eq!(empty.model_choices(), vec!["No models found".to_string()]);
        Ok(())
    }
}
