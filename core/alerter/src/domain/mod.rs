//! alerter 固有のドメイン型と純粋関数（I/O なし）

pub mod alert;
pub mod alert_cache;
pub mod message;
pub mod normalize;
pub mod trust;

pub use alert_cache::{escape_entry, AlertCache};
pub use message::{format_message, MailEnvelope, OutgoingMail};
pub use normalize::{normalize_hit, parse_response};
pub use trust::{PinnedCaPolicy, TrustMode};
