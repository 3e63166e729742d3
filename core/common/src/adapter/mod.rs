//! アダプター（Outbound ポートの実装）
//!
//! usecase はポートの trait 経由でのみファイル・時刻・ログに触れる。
//! 実装は標準実装（Std*）とテスト用のメモリ実装（Memory*）を注入する。

pub mod file_json_log;
pub mod line_log;
pub mod memory_fs;
pub mod memory_log;
pub mod std_clock;
pub mod std_fs;

pub use file_json_log::FileJsonLog;
pub use line_log::LineLog;
pub use memory_fs::MemoryFileSystem;
pub use memory_log::MemoryLog;
pub use std_clock::StdClock;
pub use std_fs::StdFileSystem;
