//! 取得と正規化: 検索 → レスポンス解析 → ヒットごとの正規化
//!
//! ここでの失敗はすべて Diagnostics に記録し、その回のアラートを減らすだけで止まらない。

use super::diagnostics::Diagnostics;
use crate::domain::{normalize_hit, parse_response};
use crate::ports::outbound::{SearchBackend, SearchFailure};

/// 検索して正規形文字列の一覧を返す。失敗時は空。
pub fn collect_alerts(search: &dyn SearchBackend, diag: &mut Diagnostics) -> Vec<String> {
    let response = match search.search() {
        Ok(response) => response,
        Err(e) => {
            diag.error(format!("Search failed: {}", e));
            return Vec::new();
        }
    };
    if let Some(failure) = &response.failure {
        report_search_failure(failure, &response.body, diag);
    }
    normalize_response(&response.body, diag)
}

fn report_search_failure(failure: &SearchFailure, body: &str, diag: &mut Diagnostics) {
    let status = failure
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());
    diag.error(format!(
        "Get '{}', StatusCode: {}, Query: >>>{}<<<",
        failure.address, status, failure.query
    ));
    diag.error(format!("Result: >>>{}<<<", body));
    if let Some(detail) = &failure.detail {
        diag.error(format!("Exception: >>>{}<<<", detail));
    }
}

/// レスポンス本文を正規形文字列の一覧にする
///
/// 本文全体が読めなければエラー 1 件で空を返す。ヒット単位の失敗はそのヒットだけ捨てる。
pub fn normalize_response(body: &str, diag: &mut Diagnostics) -> Vec<String> {
    let hits = match parse_response(body) {
        Ok(hits) => hits,
        Err(e) => {
            diag.error(format!("Couldn't parse result ({}): '{}'", e, body));
            return Vec::new();
        }
    };

    let mut alerts = Vec::with_capacity(hits.len());
    for (i, hit) in hits.iter().enumerate() {
        match normalize_hit(i + 1, hit) {
            Ok(alert) => alerts.push(alert),
            Err(rejection) => {
                for field in &rejection.fields {
                    diag.error(format!("Couldn't parse alert {}: {}", rejection.ordinal, field));
                }
                diag.error(rejection.to_string());
            }
        }
    }
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::SearchResponse;
    use common::adapter::MemoryLog;
    use common::error::Error;
    use common::ports::outbound::LogLevel;
    use std::sync::Arc;

    struct CannedSearch(Result<SearchResponse, String>);

    impl SearchBackend for CannedSearch {
        fn search(&self) -> Result<SearchResponse, Error> {
            self.0.clone().map_err(Error::http)
        }
    }

    fn diagnostics() -> (MemoryLog, Diagnostics) {
        let log = MemoryLog::new();
        let diag = Diagnostics::new(Arc::new(log.clone()));
        (log, diag)
    }

    const TWO_HITS: &str = r#"{"hits":{"hits":[
        {"_source":{"rule_id":"r1","rule_name":"Disk full","alert_id":"a1","context_message":"/var","@timestamp":"2024-03-01T08:00:00Z"}},
        {"_source":{"rule_name":"No id","alert_id":"a2","context_message":"x","@timestamp":"2024-03-01T08:00:01Z"}}
    ]}}"#;

    #[test]
    fn test_bad_hit_is_dropped_and_logged() {
        let (log, mut diag) = diagnostics();
        let alerts = normalize_response(TWO_HITS, &mut diag);
        assert_eq!(alerts, vec!["2024-03-01 08:00:00: Disk full: /var"]);
        let errors = log.messages(LogLevel::Error);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], "Couldn't parse alert 2: missing field 'rule_id'");
        assert!(errors[1].starts_with("Couldn't parse alert 2: '{"));
    }

    #[test]
    fn test_unparsable_body_is_one_error() {
        let (_, mut diag) = diagnostics();
        assert!(normalize_response("{}", &mut diag).is_empty());
        assert_eq!(diag.errors().len(), 1);
        assert!(diag.errors()[0].starts_with("Couldn't parse result"));
    }

    #[test]
    fn test_search_error_yields_nothing() {
        let (_, mut diag) = diagnostics();
        let search = CannedSearch(Err("connection refused".to_string()));
        assert!(collect_alerts(&search, &mut diag).is_empty());
        assert_eq!(diag.errors(), &["Search failed: HTTP error: connection refused"]);
    }

    #[test]
    fn test_failed_status_is_reported_with_context() {
        let (_, mut diag) = diagnostics();
        let search = CannedSearch(Ok(SearchResponse::failed(
            r#"{"error":"unauthorized"}"#,
            SearchFailure {
                address: "https://es:9200/alerts/_search".to_string(),
                query: r#"{"query":{"match_all":{}}}"#.to_string(),
                status: Some(401),
                detail: None,
            },
        )));
        assert!(collect_alerts(&search, &mut diag).is_empty());
        let errors = diag.errors();
        assert_eq!(
            errors[0],
            r#"Get 'https://es:9200/alerts/_search', StatusCode: 401, Query: >>>{"query":{"match_all":{}}}<<<"#
        );
        assert_eq!(errors[1], r#"Result: >>>{"error":"unauthorized"}<<<"#);
        // 本文に hits が無いので解析エラーも 1 件
        assert_eq!(errors.len(), 3);
    }
}
