//! 词表文件缓存
//!
//! 进程内共享, 以规范化后的绝对路径为键。
//! 文件修改时间变化后重新读取。

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, OnceLock, RwLock},
    time::SystemTime,
};

use log::{debug, warn};

use crate::{error::Error, utils::encoding::read_text_auto, wildcard::option_file::parse_lines};

// 全局词表缓存实例
static OPTION_FILE_CACHE: OnceLock<OptionFileCache> = OnceLock::new();

// 缓存项结构
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// 非空行
    pub lines: Arc<Vec<String>>,
    /// 文件修改时间
    pub mtime: Option<SystemTime>,
}

impl CacheEntry {
    /// 检查缓存是否有效
    ///
    /// 检查文件本身的时间是否与缓存中的时间一致
    pub fn is_valid(&self, path: &Path) -> bool {
        match file_mtime(path) {
            Ok(mtime) => self.mtime == Some(mtime),
            Err(_) => false,
        }
    }
}

fn file_mtime(path: &Path) -> Result<SystemTime, Error> {
    Ok(fs::metadata(path)?.modified()?)
}

/// 规范化路径, 文件不存在时保留原路径
fn cache_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

// 词表文件缓存
#[derive(Debug, Default)]
pub struct OptionFileCache {
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl OptionFileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全局缓存
    pub fn global() -> &'static OptionFileCache {
        OPTION_FILE_CACHE.get_or_init(OptionFileCache::new)
    }

    /// 读取词表文件的非空行
    pub fn lines(&self, path: &Path) -> Result<Arc<Vec<String>>, Error> {
        let key = cache_key(path);

        {
            let entries = self
                .entries
                .read()
                .map_err(|e| Error::LockError(e.to_string()))?;
            if let Some(entry) = entries.get(&key) {
                if entry.is_valid(&key) {
                    return Ok(entry.lines.clone());
                }
            }
        }

        // 未命中, 重复读取同一文件是无害的
        debug!("load option file: {}", key.display());
        let mtime = file_mtime(&key).ok();
        let lines = Arc::new(parse_lines(&read_text_auto(&key)?));

        let mut entries = self
            .entries
            .write()
            .map_err(|e| Error::LockError(e.to_string()))?;
        entries.insert(
            key,
            CacheEntry {
                lines: lines.clone(),
                mtime,
            },
        );
        Ok(lines)
    }

    /// 读取失败时返回空列表
    pub fn lines_or_empty(&self, path: &Path) -> Arc<Vec<String>> {
        match self.lines(path) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("error reading file {}: {e}", path.display());
                Arc::new(Vec::new())
            }
        }
    }

    /// 移除缓存项
    pub fn invalidate(&self, path: &Path) {
        let key = cache_key(path);
        match self.entries.write() {
            Ok(mut entries) => {
                entries.remove(&key);
                // 文件已删除时规范化失败, 再按原路径移除一次
                entries.remove(path);
            }
            Err(e) => warn!("option file cache lock error, {e}"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|v| v.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_read_through() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("color.txt");
        fs::write(&path, "red\n\n  green \nblue\n")?;

        let cache = OptionFileCache::new();
        let first = cache.lines(&path)?;
        assert_eq!(first.as_slice(), ["red", "green", "blue"]);

        let second = cache.lines(&path)?;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn test_reload_after_modification() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("color.txt");
        fs::write(&path, "red\n")?;

        let cache = OptionFileCache::new();
        assert_eq!(cache.lines(&path)?.len(), 1);

        fs::write(&path, "red\ngreen\n")?;
        // 强制修改时间不同
        let file = fs::OpenOptions::new().write(true).open(&path)?;
        file.set_modified(SystemTime::now() + Duration::from_secs(10))?;
        drop(file);

        assert_eq!(cache.lines(&path)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_invalidate() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("color.txt");
        fs::write(&path, "red\n")?;

        let cache = OptionFileCache::new();
        cache.lines(&path)?;
        cache.invalidate(&path);
        assert!(cache.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_empty() {
        let cache = OptionFileCache::new();
        let lines = cache.lines_or_empty(Path::new("/nonexistent/wildpromptor/color.txt"));
        assert!(lines.is_empty());
        assert!(cache.is_empty());
    }
}
