//! alerter 共通ライブラリ
//!
//! エラー型と Outbound ポート（ファイル・時刻・ログ）およびその標準実装を提供します。

/// エラーハンドリング
pub mod error;

/// Ports & Adapters のポート定義
pub mod ports;

/// ポートの標準実装とテスト用実装
pub mod adapter;
