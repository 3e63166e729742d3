//! 設定ファイル（JSON）の読み込み
//!
//! クエリファイルと CA 証明書もここで読む。欠けていれば設定エラーとして
//! ネットワークに触れる前に終了させる。

use super::smtp_mail::validate_mailbox;
use super::tls::decode_certificate;
use crate::domain::{MailEnvelope, PinnedCaPolicy, TrustMode};
use common::error::Error;
use common::ports::outbound::FileSystem;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CACHE_FILE: &str = "alerter_cache.txt";
pub const DEFAULT_LOG_FILE: &str = "alerter.log";

/// 読み込み・検証済みの設定
#[derive(Debug, Clone)]
pub struct AlerterConfig {
    pub search: SearchSettings,
    pub mail: MailSettings,
    pub cache_file: PathBuf,
    pub log_file: PathBuf,
}

/// 検索バックエンドへの接続設定
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub url: String,
    pub index: String,
    /// クエリファイルの中身（検証しない）
    pub query: String,
    pub username: String,
    pub password: String,
    pub trust: TrustMode,
}

/// メール送信設定
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub envelope: MailEnvelope,
    pub server: SmtpServer,
    pub username: String,
    pub password: String,
}

/// `host` または `host:port`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpServer {
    pub host: String,
    /// 省略時はトランスポートの既定ポート
    pub port: Option<u16>,
}

impl SmtpServer {
    pub fn parse(s: &str) -> Result<Self, Error> {
        let (host, port) = match s.split_once(':') {
            None => (s, None),
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| Error::config(format!("Invalid port: '{}'", port)))?;
                (host, Some(port))
            }
        };
        if host.trim().is_empty() {
            return Err(Error::config(format!("Invalid smtpserver: '{}'", s)));
        }
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl std::fmt::Display for SmtpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}

/// serde 用の内部構造（キー名はファイル形式に合わせる）
#[derive(Debug, Deserialize)]
struct AlerterConfigRaw {
    elasticsearch: ElasticsearchRaw,
    smtp: SmtpRaw,
    #[serde(default, alias = "cache_file")]
    cachefile: Option<String>,
    #[serde(default, alias = "log_file")]
    logfile: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ElasticsearchRaw {
    url: String,
    #[serde(default, alias = "ca_cert_file")]
    cacertfile: Option<String>,
    #[serde(default)]
    insecure: bool,
    #[serde(alias = "index")]
    alertingindex: String,
    #[serde(alias = "query_file")]
    queryfile: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct SmtpRaw {
    to: String,
    from: String,
    subject: String,
    #[serde(alias = "server")]
    smtpserver: String,
    username: String,
    password: String,
}

/// 設定ファイルを読み込み、参照するファイルも読んで検証する
pub fn load_config(fs: &dyn FileSystem, path: &Path) -> Result<AlerterConfig, Error> {
    if !fs.is_file(path) {
        return Err(Error::config(format!(
            "Couldn't find configfile: '{}'",
            path.display()
        )));
    }
    let raw: AlerterConfigRaw = serde_json::from_str(&fs.read_to_string(path)?)
        .map_err(|e| Error::config(format!("Invalid config '{}': {}", path.display(), e)))?;
    resolve(fs, raw)
}

fn resolve(fs: &dyn FileSystem, raw: AlerterConfigRaw) -> Result<AlerterConfig, Error> {
    let es = raw.elasticsearch;

    let query_path = PathBuf::from(&es.queryfile);
    if !fs.is_file(&query_path) {
        return Err(Error::config(format!(
            "Couldn't find queryfile: '{}'",
            es.queryfile
        )));
    }
    let query = fs.read_to_string(&query_path)?;

    let cacertfile = es.cacertfile.filter(|s| !s.is_empty());
    let trust = if es.insecure {
        TrustMode::Insecure
    } else if let Some(cacertfile) = cacertfile {
        let ca_path = PathBuf::from(&cacertfile);
        if !fs.is_file(&ca_path) {
            return Err(Error::config(format!(
                "Couldn't find cacertfile: '{}'",
                cacertfile
            )));
        }
        TrustMode::PinnedCa(PinnedCaPolicy::new(decode_certificate(&fs.read(&ca_path)?)?))
    } else {
        TrustMode::Default
    };

    let smtp = raw.smtp;
    validate_mailbox("to", &smtp.to)?;
    validate_mailbox("from", &smtp.from)?;
    let server = SmtpServer::parse(&smtp.smtpserver)?;

    Ok(AlerterConfig {
        search: SearchSettings {
            url: es.url,
            index: es.alertingindex,
            query,
            username: es.username,
            password: es.password,
            trust,
        },
        mail: MailSettings {
            envelope: MailEnvelope {
                to: smtp.to,
                from: smtp.from,
                subject: smtp.subject,
            },
            server,
            username: smtp.username,
            password: smtp.password,
        },
        cache_file: PathBuf::from(raw.cachefile.unwrap_or_else(|| DEFAULT_CACHE_FILE.to_string())),
        log_file: PathBuf::from(raw.logfile.unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::{MemoryFileSystem, StdFileSystem};
    use serde_json::json;
    use tempfile::tempdir;

    fn config_json(cacertfile: Option<&str>, insecure: bool) -> String {
        let mut es = json!({
            "url": "https://es.example:9200",
            "alertingindex": "alerts",
            "queryfile": "query.json",
            "username": "elastic",
            "password": "secret",
            "insecure": insecure
        });
        if let Some(ca) = cacertfile {
            es["cacertfile"] = json!(ca);
        }
        json!({
            "elasticsearch": es,
            "smtp": {
                "to": "ops@example.com",
                "from": "alerter@example.com",
                "subject": "Alerts",
                "smtpserver": "smtp.example.com:2465",
                "username": "alerter",
                "password": "mailsecret"
            }
        })
        .to_string()
    }

    fn fs_with(config: String) -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file("alerter.json", config)
            .with_file("query.json", r#"{"query":{"match_all":{}}}"#)
    }

    #[test]
    fn test_load_minimal_config() {
        let fs = fs_with(config_json(None, false));
        let config = load_config(&fs, Path::new("alerter.json")).unwrap();
        assert_eq!(config.search.url, "https://es.example:9200");
        assert_eq!(config.search.index, "alerts");
        assert_eq!(config.search.query, r#"{"query":{"match_all":{}}}"#);
        assert_eq!(config.search.trust, TrustMode::Default);
        assert_eq!(
            config.mail.server,
            SmtpServer {
                host: "smtp.example.com".to_string(),
                port: Some(2465)
            }
        );
        assert_eq!(config.mail.envelope.subject, "Alerts");
        assert_eq!(config.cache_file, PathBuf::from(DEFAULT_CACHE_FILE));
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_pinned_ca_is_read_at_load_time() {
        let fs = fs_with(config_json(Some("ca.der"), false)).with_file("ca.der", vec![0x30u8, 0x03]);
        let config = load_config(&fs, Path::new("alerter.json")).unwrap();
        assert_eq!(
            config.search.trust,
            TrustMode::PinnedCa(PinnedCaPolicy::new(vec![0x30, 0x03]))
        );
    }

    #[test]
    fn test_insecure_wins_and_empty_cacertfile_is_ignored() {
        let fs = fs_with(config_json(Some("missing.pem"), true));
        let config = load_config(&fs, Path::new("alerter.json")).unwrap();
        assert_eq!(config.search.trust, TrustMode::Insecure);

        let fs = fs_with(config_json(Some(""), false));
        let config = load_config(&fs, Path::new("alerter.json")).unwrap();
        assert_eq!(config.search.trust, TrustMode::Default);
    }

    #[test]
    fn test_missing_files_are_config_errors() {
        let err = load_config(&MemoryFileSystem::new(), Path::new("alerter.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("configfile"));

        let fs = MemoryFileSystem::new().with_file("alerter.json", config_json(None, false));
        let err = load_config(&fs, Path::new("alerter.json")).unwrap_err();
        assert!(err.to_string().contains("Couldn't find queryfile: 'query.json'"));

        let fs = fs_with(config_json(Some("ca.pem"), false));
        let err = load_config(&fs, Path::new("alerter.json")).unwrap_err();
        assert!(err.to_string().contains("Couldn't find cacertfile: 'ca.pem'"));
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let fs = fs_with("{ not json".to_string());
        assert!(matches!(
            load_config(&fs, Path::new("alerter.json")),
            Err(Error::Config(_))
        ));

        let fs = fs_with(json!({ "elasticsearch": {} }).to_string());
        assert!(matches!(
            load_config(&fs, Path::new("alerter.json")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_mail_settings_are_config_errors() {
        let mut config: serde_json::Value = serde_json::from_str(&config_json(None, false)).unwrap();
        config["smtp"]["smtpserver"] = json!("smtp.example.com:abc");
        let err = load_config(&fs_with(config.to_string()), Path::new("alerter.json")).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Invalid port: 'abc'");

        config["smtp"]["smtpserver"] = json!("smtp.example.com");
        config["smtp"]["to"] = json!("not an address");
        let err = load_config(&fs_with(config.to_string()), Path::new("alerter.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_smtp_server_parse() {
        assert_eq!(
            SmtpServer::parse("mail.example.com").unwrap(),
            SmtpServer {
                host: "mail.example.com".to_string(),
                port: None
            }
        );
        assert_eq!(SmtpServer::parse("mail:465").unwrap().port, Some(465));
        assert_eq!(SmtpServer::parse("mail:465").unwrap().to_string(), "mail:465");
        assert!(SmtpServer::parse("mail:70000").is_err());
        assert!(SmtpServer::parse(":25").is_err());
    }

    #[test]
    fn test_load_from_disk_with_custom_paths() {
        let dir = tempdir().unwrap();
        let query = dir.path().join("query.json");
        std::fs::write(&query, "{}").unwrap();
        let config_path = dir.path().join("alerter.json");
        let config = json!({
            "elasticsearch": {
                "url": "http://localhost:9200",
                "alertingindex": "alerts",
                "queryfile": query.to_string_lossy(),
                "username": "u",
                "password": "p"
            },
            "smtp": {
                "to": "a@example.com",
                "from": "b@example.com",
                "subject": "s",
                "smtpserver": "localhost",
                "username": "u",
                "password": "p"
            },
            "cachefile": dir.path().join("cache.txt").to_string_lossy(),
            "logfile": "logs/run.log"
        });
        std::fs::write(&config_path, config.to_string()).unwrap();

        let loaded = load_config(&StdFileSystem, &config_path).unwrap();
        assert_eq!(loaded.search.query, "{}");
        assert_eq!(loaded.cache_file, dir.path().join("cache.txt"));
        assert_eq!(loaded.log_file, PathBuf::from("logs/run.log"));
    }
}
