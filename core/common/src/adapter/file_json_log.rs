//! JSONL のログファイル（`--json-log`）
//!
//! LineLog の代わりに使う。1 レコード 1 行で追記し、`with_console` なら
//! 人間向けの 1 行を stdout にも出す。

use super::line_log::format_line;
use crate::error::Error;
use crate::ports::outbound::{FileSystem, Log, LogRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct FileJsonLog {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    console: bool,
}

impl FileJsonLog {
    /// 親ディレクトリは最初の書き込みで作る
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
            console: false,
        }
    }

    pub fn with_console(mut self) -> Self {
        self.console = true;
        self
    }
}

impl Log for FileJsonLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if self.console {
            println!("{}", format_line(record));
        }
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        self.fs.ensure_parent_dir(&self.path)?;
        let mut w = self.fs.open_append(&self.path)?;
        w.write_all(&line).and_then(|_| w.flush()).map_err(|e| {
            Error::io_msg(format!("Failed to write log '{}': {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{MemoryFileSystem, StdFileSystem};
    use tempfile::tempdir;

    #[test]
    fn test_appends_one_json_object_per_record() {
        let fs = Arc::new(MemoryFileSystem::new());
        let log = FileJsonLog::new(fs.clone(), "logs/alerter.jsonl");
        log.log(&LogRecord::info("first")).unwrap();
        log.log(&LogRecord::error("second").kind("error")).unwrap();

        let contents = fs.read_to_string(Path::new("logs/alerter.jsonl")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["level"], "error");
        assert_eq!(second["message"], "second");
        assert_eq!(second["kind"], "error");
    }

    #[test]
    fn test_console_echo_still_writes_file_under_new_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("alerter.jsonl");
        let log = FileJsonLog::new(Arc::new(StdFileSystem), &path).with_console();
        log.log(&LogRecord::info("Done!")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let record: serde_json::Value = serde_json::from_str(contents.trim_end()).unwrap();
        assert_eq!(record["message"], "Done!");
    }
}
