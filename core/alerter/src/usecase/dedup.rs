//! 既出判定とキャッシュ更新

use super::diagnostics::Diagnostics;
use crate::domain::{escape_entry, AlertCache};
use crate::ports::outbound::AlertCacheStore;
use common::error::Error;

/// キャッシュに無いものだけを順序を保って返す。落としたものはログに出す。
pub fn filter_already_triggered(
    cache: &AlertCache,
    candidates: &[String],
    diag: &Diagnostics,
) -> Vec<String> {
    let mut fresh = Vec::with_capacity(candidates.len());
    for alert in candidates {
        if cache.contains(alert) {
            diag.info(format!(
                "Ignoring already triggered alert: {}",
                escape_entry(alert)
            ));
        } else {
            fresh.push(alert.clone());
        }
    }
    fresh
}

/// フィルタ前の batch をキャッシュへ合流させて保存する。増えた件数を返す。
///
/// 増分が無ければ書き込まない。
pub fn silence_alerts(
    store: &dyn AlertCacheStore,
    cache: &mut AlertCache,
    batch: &[String],
    diag: &Diagnostics,
) -> Result<usize, Error> {
    let added = cache.merge(batch);
    if added > 0 {
        store.save(cache)?;
        diag.info(format!("Added {} triggered alerts to trigger cache.", added));
    }
    Ok(added)
}
