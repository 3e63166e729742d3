//! 送信メッセージの組み立て（純粋関数）

use chrono::NaiveDate;

/// 取得時にエラーがあった回にだけ末尾へ足す一文
pub const RETRIEVAL_PROBLEM_NOTICE: &str = "Problems when retrieving alerts, check log files.";

/// 本文を組み立てる
///
/// `had_errors` のときは `"<YYYY-MM-DD>: Problems when retrieving alerts, check log files."` を
/// 最後の 1 件として加える（件数にも含む）。この行はキャッシュには入らない。
pub fn format_message(alerts: &[String], had_errors: bool, today: NaiveDate) -> String {
    let mut lines: Vec<String> = alerts.to_vec();
    if had_errors {
        lines.push(format!(
            "{}: {}",
            today.format("%Y-%m-%d"),
            RETRIEVAL_PROBLEM_NOTICE
        ));
    }
    format!("{} alerts triggered:\n\n{}", lines.len(), lines.join("\n\n"))
}

/// 宛先・差出人・件名（設定から固定）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailEnvelope {
    pub to: String,
    pub from: String,
    pub subject: String,
}

impl MailEnvelope {
    pub fn compose(&self, body: String) -> OutgoingMail {
        OutgoingMail {
            to: self.to.clone(),
            from: self.from.clone(),
            subject: self.subject.clone(),
            body,
        }
    }
}

/// プレーンテキストのメール 1 通
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_format_message_without_errors() {
        let alerts = vec![
            "2024-03-01 08:00:00: Disk full: /var".to_string(),
            "2024-03-01 08:01:00: CPU: load 12".to_string(),
        ];
        assert_eq!(
            format_message(&alerts, false, day()),
            "2 alerts triggered:\n\n2024-03-01 08:00:00: Disk full: /var\n\n2024-03-01 08:01:00: CPU: load 12"
        );
    }

    #[test]
    fn test_format_message_appends_notice_on_errors() {
        let alerts = vec!["2024-03-01 08:00:00: Disk full: /var".to_string()];
        let body = format_message(&alerts, true, day());
        assert!(body.starts_with("2 alerts triggered:\n\n"));
        assert!(body.ends_with(
            "\n\n2024-03-01: Problems when retrieving alerts, check log files."
        ));
        // 入力は変更しない
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_compose_copies_envelope() {
        let envelope = MailEnvelope {
            to: "ops@example.com".to_string(),
            from: "alerter@example.com".to_string(),
            subject: "Alerts".to_string(),
        };
        let mail = envelope.compose("body".to_string());
        assert_eq!(mail.to, "ops@example.com");
        assert_eq!(mail.subject, "Alerts");
        assert_eq!(mail.body, "body");
    }
}
