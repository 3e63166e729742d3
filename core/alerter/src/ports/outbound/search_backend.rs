//! 検索バックエンド Outbound ポート
//!
//! 通信失敗やエラーステータスは `Err` にせず、取得できた本文と失敗内容を返す。
//! `Err` は想定外のエラー（クライアント生成失敗など）に限る。

use common::error::Error;

/// 検索の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    /// 取得できた本文（失敗時は空のこともある）
    pub body: String,
    pub failure: Option<SearchFailure>,
}

impl SearchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            failure: None,
        }
    }

    pub fn failed(body: impl Into<String>, failure: SearchFailure) -> Self {
        Self {
            body: body.into(),
            failure: Some(failure),
        }
    }
}

/// 失敗の診断情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    pub address: String,
    pub query: String,
    /// HTTP ステータス（応答が無ければ None）
    pub status: Option<u16>,
    /// 送受信エラーの詳細
    pub detail: Option<String>,
}

/// 保存済みクエリで検索し、レスポンス本文を返す
pub trait SearchBackend: Send + Sync {
    fn search(&self) -> Result<SearchResponse, Error>;
}
