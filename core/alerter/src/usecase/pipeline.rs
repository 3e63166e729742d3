//! アラート配信パイプライン
//!
//! 取得 → 正規化 → 既出フィルタ → (残りがあれば) 整形・送信 → キャッシュ更新 の一本道。
//! キャッシュには送信の成否にかかわらずフィルタ前の batch を入れる。
//! 送信に失敗したアラートも「既出」になり、次回以降は再送されない（重複送信を避ける側に倒している）。

use super::dedup::{filter_already_triggered, silence_alerts};
use super::diagnostics::Diagnostics;
use super::ingest::collect_alerts;
use crate::domain::{format_message, MailEnvelope};
use crate::ports::outbound::{AlertCacheStore, MailTransport, SearchBackend};
use common::error::Error;
use common::ports::outbound::Clock;
use std::sync::Arc;

/// 1 回の実行結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 正規化できたアラート数（フィルタ前）
    pub fetched: usize,
    /// 送信したアラート数（取得エラーの通知行は含まない）
    pub delivered: usize,
    /// キャッシュに増えた件数
    pub cached: usize,
    pub errors: usize,
}

pub struct AlertPipeline {
    search: Arc<dyn SearchBackend>,
    cache_store: Arc<dyn AlertCacheStore>,
    mailer: Arc<dyn MailTransport>,
    clock: Arc<dyn Clock>,
    envelope: MailEnvelope,
}

impl AlertPipeline {
    pub fn new(
        search: Arc<dyn SearchBackend>,
        cache_store: Arc<dyn AlertCacheStore>,
        mailer: Arc<dyn MailTransport>,
        clock: Arc<dyn Clock>,
        envelope: MailEnvelope,
    ) -> Self {
        Self {
            search,
            cache_store,
            mailer,
            clock,
            envelope,
        }
    }

    /// パイプラインを 1 回実行する
    ///
    /// 送信エラーはキャッシュ更新の後で返す。キャッシュ I/O エラーはそのまま返す。
    pub fn run(&self, diag: &mut Diagnostics) -> Result<RunSummary, Error> {
        let batch = collect_alerts(self.search.as_ref(), diag);

        let mut cache = self.cache_store.load()?;
        let fresh = filter_already_triggered(&cache, &batch, diag);

        let delivery = if fresh.is_empty() {
            Ok(())
        } else {
            self.deliver(&fresh, diag)
        };

        let cached = silence_alerts(self.cache_store.as_ref(), &mut cache, &batch, diag)?;
        delivery?;

        diag.info("Done!");
        Ok(RunSummary {
            fetched: batch.len(),
            delivered: fresh.len(),
            cached,
            errors: diag.errors().len(),
        })
    }

    fn deliver(&self, fresh: &[String], diag: &Diagnostics) -> Result<(), Error> {
        let today = self.clock.now_utc().date_naive();
        let body = format_message(fresh, diag.has_errors(), today);
        diag.info(format!(">>>{}<<<", body));
        self.mailer.send(&self.envelope.compose(body))
    }
}
