//! メール送信 Outbound ポート

use crate::domain::OutgoingMail;
use common::error::Error;

/// 1 通送る。再送はしない。
pub trait MailTransport: Send + Sync {
    fn send(&self, mail: &OutgoingMail) -> Result<(), Error>;
}
