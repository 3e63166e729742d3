//! アダプター（Outbound ポートの実装と設定の読み込み）

pub mod config;
pub mod elastic_search;
pub mod file_alert_cache;
pub mod smtp_mail;
pub mod tls;

pub use config::{load_config, AlerterConfig};
pub use elastic_search::ElasticSearch;
pub use file_alert_cache::{FileAlertCacheStore, ReadOnlyAlertCacheStore};
pub use smtp_mail::{DryRunMailTransport, SmtpMailTransport};
