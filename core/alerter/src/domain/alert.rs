//! 1 件のアラート

use chrono::{DateTime, Utc};

/// 正規形文字列のタイムスタンプ書式
pub const CANONICAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 検索ヒットから組み立てたアラート
///
/// `normalize::parse_alert` だけが生成する。rule_id / rule_name / alert_id は空でなく、
/// timestamp は番兵値（0001-01-01 や Unix epoch）ではない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRecord {
    #[allow(dead_code)] // 存在と非空の検証のみ（正規形には含めない）
    pub rule_id: String,
    pub rule_name: String,
    #[allow(dead_code)] // 同上
    pub alert_id: String,
    /// 空文字列もあり得る
    pub context_message: String,
    pub timestamp: DateTime<Utc>,
}

impl AlertRecord {
    /// 正規形文字列 `"<YYYY-MM-DD HH:MM:SS>: <rule_name>: <context_message>"`
    ///
    /// 重複判定のキーを兼ねる。rule_id と alert_id は含まない。
    pub fn canonical(&self) -> String {
        format!(
            "{}: {}: {}",
            self.timestamp.format(CANONICAL_TIME_FORMAT),
            self.rule_name,
            self.context_message
        )
    }
}
