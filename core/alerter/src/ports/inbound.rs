//! Inbound ポート: ドライバ（CLI）がアプリを呼び出すインターフェース

use common::error::Error;

/// パイプラインを 1 回実行し終了コードを返す
///
/// main はこの trait を実装した Runner の run を呼び出す。
pub trait UseCaseRunner {
    fn run(&self) -> Result<i32, Error>;
}
