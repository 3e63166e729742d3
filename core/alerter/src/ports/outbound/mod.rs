//! Outbound ポート: アプリが外界を使うための trait

pub mod alert_cache_store;
pub mod mail_transport;
pub mod search_backend;

pub use alert_cache_store::AlertCacheStore;
pub use mail_transport::MailTransport;
pub use search_backend::{SearchBackend, SearchFailure, SearchResponse};
