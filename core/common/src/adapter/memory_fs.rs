//! メモリ上のファイルシステム（テスト用）

use crate::error::Error;
use crate::ports::outbound::{FileMetadata, FileSystem};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type Files = Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>;

/// パス -> 内容のマップで動く FileSystem 実装。ディレクトリは持たない。
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Files,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期ファイルを置く
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), contents.into());
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<u8>>>, Error> {
        self.files
            .lock()
            .map_err(|_| Error::io_msg("memory file system lock poisoned"))
    }
}

fn not_found(path: &Path) -> Error {
    Error::io_msg(format!("Failed to read '{}': not found", path.display()))
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, Error> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| Error::io_msg(format!("'{}' is not UTF-8: {}", path.display(), e)))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, Error> {
        self.lock()?.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), Error> {
        self.lock()?
            .insert(path.to_path_buf(), contents.as_bytes().to_vec());
        Ok(())
    }

    fn create_dir_all(&self, _path: &Path) -> Result<(), Error> {
        Ok(())
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error> {
        self.lock()?
            .get(path)
            .map(|b| FileMetadata::new(b.len() as u64, true))
            .ok_or_else(|| not_found(path))
    }

    fn open_append(&self, path: &Path) -> Result<Box<dyn Write + Send>, Error> {
        self.lock()?.entry(path.to_path_buf()).or_default();
        Ok(Box::new(MemoryAppender {
            files: Arc::clone(&self.files),
            path: path.to_path_buf(),
        }))
    }
}

struct MemoryAppender {
    files: Files,
    path: PathBuf,
}

impl Write for MemoryAppender {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "lock poisoned"))?;
        files.entry(self.path.clone()).or_default().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fs_roundtrip_and_append() {
        let fs = MemoryFileSystem::new().with_file("query.json", "{}");
        assert!(fs.is_file(Path::new("query.json")));
        assert!(!fs.exists(Path::new("other.json")));

        fs.write(Path::new("cache.txt"), "a\n").unwrap();
        fs.open_append(Path::new("cache.txt"))
            .unwrap()
            .write_all(b"b\n")
            .unwrap();
        assert_eq!(fs.read_to_string(Path::new("cache.txt")).unwrap(), "a\nb\n");
        assert!(fs.read(Path::new("missing")).is_err());
    }
}
