//! Structured security request log.
//!
//! Every security-relevant action (registration, login, token checks, ledger
//! writes, notification reads) is emitted as one event on the `security`
//! tracing target. The event carries a `Normal`/`Suspicious` tag and the HTTP
//! metadata columns of the CSIC 2010 web-attack dataset, and is rendered as a
//! single `key="value"` line that the downstream anomaly classifier parses.
//!
//! Request bodies are redacted before they are recorded: values under
//! credential-like keys never reach the log.

use axum::http::{HeaderMap, Method, Uri, header};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::{Display, Write as _};
use std::sync::Arc;

pub const SECURITY_TARGET: &str = "security";

/// Longest request body recorded in the `content` column.
pub const MAX_LOGGED_CONTENT: usize = 64 * 1024;

const REDACTED: &str = "[REDACTED]";
const SENSITIVE_KEYS: &[&str] = &["password", "token", "secret", "jwt_secret"];
const MISSING: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    Normal,
    Suspicious,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Normal => "Normal",
            Classification::Suspicious => "Suspicious",
        }
    }
}

impl Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP metadata of the request that triggered a security event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    pub method: String,
    pub url: String,
    pub user_agent: String,
    pub pragma: String,
    pub cache_control: String,
    pub accept: String,
    pub accept_encoding: String,
    pub accept_charset: String,
    pub language: String,
    pub host: String,
    pub cookie: String,
    pub content_type: String,
    pub connection: String,
    pub content_length: String,
    pub content: String,
}

impl RequestMetadata {
    pub fn from_request(method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> Self {
        let get = |name: header::HeaderName| -> String {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| MISSING.to_string())
        };

        let content_length = headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| "0".to_string());

        Self {
            method: method.to_string(),
            url: uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| uri.path().to_string()),
            user_agent: get(header::USER_AGENT),
            pragma: get(header::PRAGMA),
            cache_control: get(header::CACHE_CONTROL),
            accept: get(header::ACCEPT),
            accept_encoding: get(header::ACCEPT_ENCODING),
            accept_charset: get(header::HeaderName::from_static("accept-charset")),
            language: get(header::ACCEPT_LANGUAGE),
            host: get(header::HOST),
            cookie: get(header::COOKIE),
            content_type: get(header::CONTENT_TYPE),
            connection: get(header::CONNECTION),
            content_length,
            content: redact_content(body),
        }
    }

    /// Dataset columns in their canonical order.
    fn columns(&self) -> [(&'static str, &str); 15] {
        [
            ("Method", &self.method),
            ("URL", &self.url),
            ("User-Agent", &self.user_agent),
            ("Pragma", &self.pragma),
            ("Cache-Control", &self.cache_control),
            ("Accept", &self.accept),
            ("Accept-encoding", &self.accept_encoding),
            ("Accept-charset", &self.accept_charset),
            ("language", &self.language),
            ("host", &self.host),
            ("cookie", &self.cookie),
            ("content-type", &self.content_type),
            ("connection", &self.connection),
            // dataset spelling
            ("lenght", &self.content_length),
            ("content", &self.content),
        ]
    }
}

/// Render a request body for the log with credential values masked.
///
/// JSON bodies are re-serialized with sensitive keys replaced at any depth.
/// Anything else is recorded as lossy UTF-8. Both are capped at
/// [`MAX_LOGGED_CONTENT`] bytes.
pub fn redact_content(body: &[u8]) -> String {
    if body.is_empty() {
        return String::new();
    }

    let rendered = match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(mut value) => {
            redact_value(&mut value);
            value.to_string()
        }
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    };

    truncate_on_char_boundary(rendered, MAX_LOGGED_CONTENT)
}

fn redact_value(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                let lowered = key.to_ascii_lowercase();
                if SENSITIVE_KEYS.contains(&lowered.as_str()) {
                    *v = serde_json::Value::String(REDACTED.to_string());
                } else {
                    redact_value(v);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}

fn truncate_on_char_boundary(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    s
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// Per-service handle that stamps the service name on every event.
#[derive(Debug, Clone)]
pub struct SecurityLog {
    service: Arc<str>,
}

impl SecurityLog {
    pub fn new(service: impl Into<Arc<str>>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn normal(&self, event: &'static str) -> SecurityEvent<'_> {
        SecurityEvent::new(&self.service, event).classification(Classification::Normal)
    }

    pub fn suspicious(&self, event: &'static str) -> SecurityEvent<'_> {
        SecurityEvent::new(&self.service, event).classification(Classification::Suspicious)
    }

    /// Event with no classification tag.
    pub fn untagged(&self, event: &'static str) -> SecurityEvent<'_> {
        SecurityEvent::new(&self.service, event)
    }
}

#[derive(Debug, Clone)]
pub struct SecurityEvent<'a> {
    service: &'a str,
    event: &'static str,
    timestamp: DateTime<Utc>,
    classification: Option<Classification>,
    request: Option<&'a RequestMetadata>,
    details: Vec<(&'static str, String)>,
}

impl<'a> SecurityEvent<'a> {
    pub fn new(service: &'a str, event: &'static str) -> Self {
        Self {
            service,
            event,
            timestamp: Utc::now(),
            classification: None,
            request: None,
            details: Vec::new(),
        }
    }

    pub fn classification(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    pub fn request(mut self, request: &'a RequestMetadata) -> Self {
        self.request = Some(request);
        self
    }

    pub fn detail(mut self, key: &'static str, value: impl Display) -> Self {
        self.details.push((key, value.to_string()));
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn to_log_line(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(20 + self.details.len());
        let timestamp = self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        pairs.push(("timestamp", &timestamp));

        if let Some(request) = self.request {
            pairs.extend(request.columns());
        }
        if let Some(classification) = self.classification {
            pairs.push(("classification", classification.as_str()));
        }
        pairs.push(("event", self.event));
        pairs.push(("service", self.service));
        pairs.extend(self.details.iter().map(|(k, v)| (*k, v.as_str())));

        let mut line = String::new();
        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            let _ = write!(line, "{}=\"{}\"", key, escape(value));
        }
        line
    }

    pub fn emit(self) {
        let line = self.to_log_line();
        match self.classification {
            Some(Classification::Suspicious) => tracing::warn!(
                target: SECURITY_TARGET,
                classification = "Suspicious",
                event = self.event,
                service = self.service,
                "{}",
                line
            ),
            Some(Classification::Normal) => tracing::info!(
                target: SECURITY_TARGET,
                classification = "Normal",
                event = self.event,
                service = self.service,
                "{}",
                line
            ),
            None => tracing::info!(
                target: SECURITY_TARGET,
                event = self.event,
                service = self.service,
                "{}",
                line
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::TimeZone;

    fn sample_request(body: &[u8]) -> RequestMetadata {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3001"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer should-not-appear"),
        );
        let uri: Uri = "/login?next=%2Fhome".parse().unwrap();
        RequestMetadata::from_request(&Method::POST, &uri, &headers, body)
    }

    #[test]
    fn passwords_and_tokens_are_redacted_at_any_depth() {
        let body = br#"{"email":"alice@x.com","password":"pw123","nested":{"Token":"abc"},"list":[{"secret":"s"}]}"#;
        let content = redact_content(body);

        assert!(content.contains("alice@x.com"));
        assert!(!content.contains("pw123"));
        assert!(!content.contains("\"abc\""));
        assert!(!content.contains("\"s\""));
        assert_eq!(content.matches(REDACTED).count(), 3);
    }

    #[test]
    fn non_json_body_is_kept_verbatim() {
        assert_eq!(redact_content(b"amount=10&to=bob"), "amount=10&to=bob");
        assert_eq!(redact_content(b""), "");
    }

    #[test]
    fn oversized_content_is_truncated() {
        let body = "é".repeat(MAX_LOGGED_CONTENT);
        let content = redact_content(body.as_bytes());
        assert!(content.len() <= MAX_LOGGED_CONTENT);
        assert!(content.chars().all(|c| c == 'é'));
    }

    #[test]
    fn missing_headers_render_as_dash() {
        let meta = sample_request(b"");
        assert_eq!(meta.pragma, "-");
        assert_eq!(meta.cookie, "-");
        assert_eq!(meta.content_length, "0");
        assert_eq!(meta.url, "/login?next=%2Fhome");
    }

    #[test]
    fn log_line_has_dataset_columns_in_order() {
        let meta = sample_request(br#"{"email":"alice@x.com","password":"pw123"}"#);
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let line = SecurityLog::new("auth-service")
            .suspicious("LoginFailure")
            .request(&meta)
            .detail("email", "alice@x.com")
            .detail("reason", "InvalidCredentials")
            .at(ts)
            .to_log_line();

        assert!(line.starts_with(r#"timestamp="2025-01-02T03:04:05.000Z" Method="POST" URL="/login?next=%2Fhome" User-Agent="curl/8.0""#));
        assert!(line.contains(r#"lenght="0""#));
        assert!(line.contains(r#"classification="Suspicious" event="LoginFailure" service="auth-service" email="alice@x.com" reason="InvalidCredentials""#));
        assert!(!line.contains("pw123"));
        assert!(!line.contains("should-not-appear"));

        let method_pos = line.find("Method=").unwrap();
        let content_pos = line.find("content=").unwrap();
        let class_pos = line.find("classification=").unwrap();
        assert!(method_pos < content_pos && content_pos < class_pos);
    }

    #[test]
    fn quotes_in_values_are_escaped() {
        let meta = sample_request(br#"{"note":"say \"hi\""}"#);
        let line = SecurityLog::new("payment-service")
            .normal("PaymentProcessingAttempt")
            .request(&meta)
            .to_log_line();
        assert!(line.contains(r#"content="{\"note\":\"say \\\"hi\\\"\"}""#));
    }

    #[test]
    fn untagged_event_has_no_classification() {
        let line = SecurityLog::new("payment-service")
            .untagged("NotificationDispatchFailure")
            .detail("error", "timeout")
            .to_log_line();
        assert!(!line.contains("classification="));
        assert!(line.contains(r#"event="NotificationDispatchFailure""#));
        assert!(line.contains(r#"error="timeout""#));
    }
}
