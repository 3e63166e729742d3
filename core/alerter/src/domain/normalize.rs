//! 検索レスポンス → アラート正規形文字列
//!
//! 失敗は例外ではなく理由付きの `Err` で返す。ログ出力は呼び出し側（usecase::ingest）。

use super::alert::AlertRecord;
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use serde_json::{Map, Value};

pub const FIELD_RULE_ID: &str = "rule_id";
pub const FIELD_RULE_NAME: &str = "rule_name";
pub const FIELD_ALERT_ID: &str = "alert_id";
pub const FIELD_CONTEXT_MESSAGE: &str = "context_message";
pub const FIELD_TIMESTAMP: &str = "@timestamp";

/// レスポンス全体が読めない理由
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    #[error("not a JSON object: {0}")]
    NotJsonObject(String),
    #[error("missing hits.hits array")]
    MissingHits,
}

/// フィールド単位の失敗
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("missing _source object")]
    MissingSource,
    #[error("missing field '{0}'")]
    Missing(&'static str),
    #[error("field '{0}' is not a scalar")]
    NotScalar(&'static str),
    #[error("field '{0}' is empty")]
    Empty(&'static str),
    #[error("field '{0}' is not a valid timestamp")]
    InvalidTimestamp(&'static str),
}

/// 1 件のヒットを捨てた理由
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Couldn't parse alert {ordinal}: '{raw}'")]
pub struct Rejection {
    /// 1 始まりのヒット番号
    pub ordinal: usize,
    pub fields: Vec<FieldError>,
    /// ヒットの JSON そのもの（スキーマずれの調査用）
    pub raw: String,
}

/// レスポンス本文から `hits.hits` 配列を取り出す
pub fn parse_response(body: &str) -> Result<Vec<Value>, ResponseError> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| ResponseError::NotJsonObject(e.to_string()))?;
    if !root.is_object() {
        return Err(ResponseError::NotJsonObject("top level is not an object".to_string()));
    }
    root.get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(Value::as_array)
        .cloned()
        .ok_or(ResponseError::MissingHits)
}

/// ヒット 1 件を正規形文字列にする
pub fn normalize_hit(ordinal: usize, hit: &Value) -> Result<String, Rejection> {
    parse_alert(hit)
        .map(|alert| alert.canonical())
        .map_err(|fields| Rejection {
            ordinal,
            fields,
            raw: hit.to_string(),
        })
}

/// ヒット 1 件を AlertRecord にする。失敗したフィールドをすべて返す。
pub fn parse_alert(hit: &Value) -> Result<AlertRecord, Vec<FieldError>> {
    let source = hit
        .get("_source")
        .and_then(Value::as_object)
        .ok_or_else(|| vec![FieldError::MissingSource])?;

    let mut errors = Vec::new();
    let rule_id = required_text(source, FIELD_RULE_ID).map_err(|e| errors.push(e));
    let rule_name = required_text(source, FIELD_RULE_NAME).map_err(|e| errors.push(e));
    let alert_id = required_text(source, FIELD_ALERT_ID).map_err(|e| errors.push(e));
    let context_message =
        scalar_text(source, FIELD_CONTEXT_MESSAGE).map_err(|e| errors.push(e));
    let timestamp = timestamp(source, FIELD_TIMESTAMP).map_err(|e| errors.push(e));

    match (rule_id, rule_name, alert_id, context_message, timestamp) {
        (Ok(rule_id), Ok(rule_name), Ok(alert_id), Ok(context_message), Ok(timestamp)) => {
            Ok(AlertRecord {
                rule_id,
                rule_name,
                alert_id,
                context_message,
                timestamp,
            })
        }
        _ => Err(errors),
    }
}

/// 存在するスカラー値を文字列化する。null は空文字列。
fn scalar_text(source: &Map<String, Value>, field: &'static str) -> Result<String, FieldError> {
    match source.get(field) {
        None => Err(FieldError::Missing(field)),
        Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Err(FieldError::NotScalar(field)),
    }
}

fn required_text(source: &Map<String, Value>, field: &'static str) -> Result<String, FieldError> {
    let text = scalar_text(source, field)?;
    if text.is_empty() {
        return Err(FieldError::Empty(field));
    }
    Ok(text)
}

fn timestamp(source: &Map<String, Value>, field: &'static str) -> Result<DateTime<Utc>, FieldError> {
    let raw = match source.get(field) {
        None => return Err(FieldError::Missing(field)),
        Some(Value::String(s)) => s,
        Some(Value::Array(_)) | Some(Value::Object(_)) => return Err(FieldError::NotScalar(field)),
        Some(_) => return Err(FieldError::InvalidTimestamp(field)),
    };
    parse_timestamp(raw)
        .filter(|t| !is_sentinel(t))
        .ok_or(FieldError::InvalidTimestamp(field))
}

/// RFC 3339、またはオフセット無しの ISO 8601（UTC とみなす）
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// 0001-01-01T00:00:00 と Unix epoch は「値なし」扱い
fn is_sentinel(t: &DateTime<Utc>) -> bool {
    let zero_day = t.year() == 1 && t.ordinal() == 1 && t.num_seconds_from_midnight() == 0;
    zero_day || t.timestamp() == 0
}
