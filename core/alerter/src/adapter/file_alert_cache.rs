//! 既出アラートキャッシュのファイル保存

use crate::domain::AlertCache;
use crate::ports::outbound::AlertCacheStore;
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 1 行 1 エントリのテキストファイルに保存する。保存は毎回ファイル全体の書き換え。
pub struct FileAlertCacheStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FileAlertCacheStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl AlertCacheStore for FileAlertCacheStore {
    fn load(&self) -> Result<AlertCache, Error> {
        if !self.fs.exists(&self.path) {
            return Ok(AlertCache::new());
        }
        Ok(AlertCache::parse(&self.fs.read_to_string(&self.path)?))
    }

    fn save(&self, cache: &AlertCache) -> Result<(), Error> {
        self.fs.write(&self.path, &cache.render())
    }
}

/// 読むだけで保存しない（--dry-run）
pub struct ReadOnlyAlertCacheStore {
    inner: Arc<dyn AlertCacheStore>,
}

impl ReadOnlyAlertCacheStore {
    pub fn new(inner: Arc<dyn AlertCacheStore>) -> Self {
        Self { inner }
    }
}

impl AlertCacheStore for ReadOnlyAlertCacheStore {
    fn load(&self) -> Result<AlertCache, Error> {
        self.inner.load()
    }

    fn save(&self, _cache: &AlertCache) -> Result<(), Error> {
        Ok(())
    }
}
