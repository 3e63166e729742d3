//! ファイルシステム Outbound ポート
//!
//! usecase・adapter はこの trait 経由でのみファイル I/O を行う。

use crate::error::Error;
use std::path::Path;

/// ファイルメタデータ（存在・サイズ・種別）
#[derive(Debug, Clone)]
pub struct FileMetadata {
    len: u64,
    is_file: bool,
}

impl FileMetadata {
    pub fn new(len: u64, is_file: bool) -> Self {
        Self { len, is_file }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }
}

/// ファイルシステム抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdFileSystem` やテスト用の `MemoryFileSystem`。
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, Error>;
    /// バイト列として読む（DER 証明書など）
    fn read(&self, path: &Path) -> Result<Vec<u8>, Error>;
    /// ファイル全体を書き換える
    fn write(&self, path: &Path, contents: &str) -> Result<(), Error>;
    fn create_dir_all(&self, path: &Path) -> Result<(), Error>;
    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error>;
    /// 追記用に開く（存在しなければ作成）。返した Writer を drop すると閉じる。
    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error>;

    /// パスが存在するか（metadata が取れれば true）
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }

    /// 通常ファイルとして存在するか
    fn is_file(&self, path: &Path) -> bool {
        self.metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    /// 書き込み先の親ディレクトリが無ければ作る
    fn ensure_parent_dir(&self, path: &Path) -> Result<(), Error> {
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !self.exists(dir) => {
                self.create_dir_all(dir)
            }
            _ => Ok(()),
        }
    }
}
