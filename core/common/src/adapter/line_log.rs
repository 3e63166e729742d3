//! 人間向けの 1 行ログ（コンソール + テキストファイル）
//!
//! `2024-03-01 12:30:00: ERROR: message` の形式で stdout に出し、同じ行をファイルへ追記する。

use crate::error::Error;
use crate::ports::outbound::{FileSystem, Log, LogLevel, LogRecord};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// レコードを 1 行に整形する（改行は付けない）
pub fn format_line(record: &LogRecord) -> String {
    let ts = DateTime::parse_from_rfc3339(&record.ts)
        .map(|t| t.with_timezone(&Utc).format(LINE_TIME_FORMAT).to_string())
        .unwrap_or_else(|_| record.ts.clone());
    let level = match record.level {
        LogLevel::Error => "ERROR: ",
        LogLevel::Warn => "WARN: ",
        LogLevel::Info => "",
        LogLevel::Debug => "DEBUG: ",
    };
    let mut line = format!("{}: {}{}", ts, level, record.message);
    if let Some(fields) = &record.fields {
        if let Ok(json) = serde_json::to_string(fields) {
            line.push(' ');
            line.push_str(&json);
        }
    }
    line
}

/// コンソールとファイルの両方に 1 行ずつ書く Log 実装
pub struct LineLog {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    console: bool,
}

impl LineLog {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
            console: true,
        }
    }

    /// ファイルにだけ書く（テスト用）
    pub fn without_console(mut self) -> Self {
        self.console = false;
        self
    }
}

impl Log for LineLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        let line = format_line(record);
        if self.console {
            println!("{}", line);
        }
        self.fs.ensure_parent_dir(&self.path)?;
        let mut w = self.fs.open_append(&self.path)?;
        w.write_all(line.as_bytes())
            .and_then(|_| w.write_all(b"\n"))
            .and_then(|_| w.flush())
            .map_err(|e| {
                Error::io_msg(format!("Failed to write log '{}': {}", self.path.display(), e))
            })
    }
}
