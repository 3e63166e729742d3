//! Elasticsearch 互換バックエンドへの検索
//!
//! `GET <url>/<index>/_search` にクエリを JSON 本文として載せる（読み取り系メソッドに本文を付ける流儀）。
//! タイムアウトは設定しない。

use super::config::SearchSettings;
use super::tls::pinned_client_config;
use crate::domain::TrustMode;
use crate::ports::outbound::{SearchBackend, SearchFailure, SearchResponse};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::error::Error;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

/// 検索 URL
pub fn search_address(url: &str, index: &str) -> String {
    format!("{}/{}/_search", url.trim_end_matches('/'), index)
}

/// `Authorization` ヘッダの値（Basic 認証）
pub fn basic_authorization(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, password))
    )
}

fn build_client(trust: &TrustMode) -> Result<reqwest::blocking::Client, Error> {
    let builder = reqwest::blocking::Client::builder().timeout(None);
    let builder = match trust {
        TrustMode::Default => builder,
        TrustMode::Insecure => builder.danger_accept_invalid_certs(true),
        TrustMode::PinnedCa(policy) => {
            builder.use_preconfigured_tls(pinned_client_config(policy.clone())?)
        }
    };
    builder
        .build()
        .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))
}

/// reqwest（blocking）で検索する SearchBackend 実装
pub struct ElasticSearch {
    client: reqwest::blocking::Client,
    address: String,
    authorization: String,
    query: String,
}

impl ElasticSearch {
    pub fn new(settings: &SearchSettings) -> Result<Self, Error> {
        Ok(Self {
            client: build_client(&settings.trust)?,
            address: search_address(&settings.url, &settings.index),
            authorization: basic_authorization(&settings.username, &settings.password),
            query: settings.query.clone(),
        })
    }

    fn failure(&self, status: Option<u16>, detail: Option<String>) -> SearchFailure {
        SearchFailure {
            address: self.address.clone(),
            query: self.query.clone(),
            status,
            detail,
        }
    }
}

impl SearchBackend for ElasticSearch {
    fn search(&self) -> Result<SearchResponse, Error> {
        let sent = self
            .client
            .get(&self.address)
            .header(AUTHORIZATION, &self.authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(self.query.clone())
            .send();

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                return Ok(SearchResponse::failed(
                    "",
                    self.failure(None, Some(format!("{:?}", e))),
                ))
            }
        };

        let status = response.status();
        match response.text() {
            Ok(body) if status.is_success() => Ok(SearchResponse::ok(body)),
            Ok(body) => Ok(SearchResponse::failed(
                body,
                self.failure(Some(status.as_u16()), None),
            )),
            Err(e) => Ok(SearchResponse::failed(
                "",
                self.failure(Some(status.as_u16()), Some(format!("{:?}", e))),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PinnedCaPolicy;

    #[test]
    fn test_search_address() {
        assert_eq!(
            search_address("https://es.example:9200", "alerts"),
            "https://es.example:9200/alerts/_search"
        );
        assert_eq!(
            search_address("https://es.example:9200/", ".alerts-*"),
            "https://es.example:9200/.alerts-*/_search"
        );
    }

    #[test]
    fn test_basic_authorization() {
        // base64("elastic:changeme")
        assert_eq!(
            basic_authorization("elastic", "changeme"),
            "Basic ZWxhc3RpYzpjaGFuZ2VtZQ=="
        );
    }

    #[test]
    fn test_client_builds_for_every_trust_mode() {
        let ca = rcgen::generate_simple_self_signed(vec!["es.example".to_string()])
            .unwrap()
            .serialize_der()
            .unwrap();
        for trust in [
            TrustMode::Default,
            TrustMode::Insecure,
            TrustMode::PinnedCa(PinnedCaPolicy::new(ca)),
        ] {
            assert!(build_client(&trust).is_ok());
        }
    }

    #[test]
    fn test_pinned_ca_that_does_not_parse_fails_before_any_request() {
        let trust = TrustMode::PinnedCa(PinnedCaPolicy::new(b"ca".to_vec()));
        assert!(matches!(build_client(&trust), Err(Error::Config(_))));
    }

    #[test]
    fn test_unreachable_backend_is_a_reported_failure() {
        let settings = SearchSettings {
            url: "http://127.0.0.1:1".to_string(),
            index: "alerts".to_string(),
            query: r#"{"query":{"match_all":{}}}"#.to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            trust: TrustMode::Default,
        };
        let response = ElasticSearch::new(&settings).unwrap().search().unwrap();
        assert_eq!(response.body, "");
        let failure = response.failure.unwrap();
        assert_eq!(failure.address, "http://127.0.0.1:1/alerts/_search");
        assert_eq!(failure.status, None);
        assert!(failure.detail.is_some());
    }
}
