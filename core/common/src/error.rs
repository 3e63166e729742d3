//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。main はこの型から終了コードを決める。

/// エラー型
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// コマンドライン引数の誤り
    #[error("{0}")]
    Usage(String),
    /// 設定ファイル・クエリファイル・CA 証明書の不備
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
    /// 検索バックエンドとの通信エラー
    #[error("HTTP error: {0}")]
    Http(String),
    /// メール送信エラー
    #[error("Mail error: {0}")]
    Mail(String),
}

impl Error {
    /// 引数不正エラー
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// I/Oエラー（メッセージのみ）
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn mail(msg: impl Into<String>) -> Self {
        Self::Mail(msg.into())
    }

    /// 使い方の表示が必要なエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// プロセスの終了コード（エラー時は常に 1）
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
