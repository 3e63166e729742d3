//! 1 回の実行の診断（ログ出力とエラーの蓄積）
//!
//! パイプラインはこの値を引き回してログを書く。エラーが 1 件でもあれば
//! 送信メッセージに「取得時に問題があった」旨を付ける。

use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

pub struct Diagnostics {
    log: Arc<dyn Log>,
    errors: Vec<String>,
}

impl Diagnostics {
    pub fn new(log: Arc<dyn Log>) -> Self {
        Self {
            log,
            errors: Vec::new(),
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.write(LogLevel::Info, message.into());
    }

    /// エラーを記録し、ログにも出す
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.write(LogLevel::Error, message.clone());
        self.errors.push(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn write(&self, level: LogLevel, message: String) {
        // ログ出力の失敗で実行を止めない
        let _ = self.log.log(
            &LogRecord::new(level, message)
                .layer("usecase")
                .kind("pipeline"),
        );
    }
}
