//! 既出アラートキャッシュの永続化 Outbound ポート

use crate::domain::AlertCache;
use common::error::Error;

/// キャッシュの読み込みと全体書き換え
///
/// 実装は `FileAlertCacheStore`（FileSystem 経由）と dry-run 用の `ReadOnlyAlertCacheStore`。
pub trait AlertCacheStore: Send + Sync {
    /// 保存先が無ければ空のキャッシュを返す
    fn load(&self) -> Result<AlertCache, Error>;
    fn save(&self, cache: &AlertCache) -> Result<(), Error>;
}
