use std::fmt;

use serde_json::Value;
use thiserror::Error;

const TRANSIENT_STATUSES: [u16; 4] = [500, 502, 503, 504];
const UNAVAILABLE_MARKER: &str = "unavailable";

/// Why the remote service refused a request that will not be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestCategory {
    /// Quota or rate limit exhausted (429, `RESOURCE_EXHAUSTED`)
    RateLimited,
    /// Malformed request or unsupported content (400)
    InvalidRequest,
    /// Key rejected (401, 403)
    Unauthorized,
    /// Model or file does not exist (404)
    NotFound,
    /// Anything else
    Other,
}

impl RequestCategory {
    fn classify(status: u16, message: &str) -> Self {
        if status == 429 || message.contains("RESOURCE_EXHAUSTED") {
            return RequestCategory::RateLimited;
        }
        match status {
            400 => RequestCategory::InvalidRequest,
            401 | 403 => RequestCategory::Unauthorized,
            404 => RequestCategory::NotFound,
            _ => RequestCategory::Other,
        }
    }
}

impl fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestCategory::RateLimited => "rate limited",
            RequestCategory::InvalidRequest => "invalid request",
            RequestCategory::Unauthorized => "unauthorized",
            RequestCategory::NotFound => "not found",
            RequestCategory::Other => "rejected",
        };
        write!(f, "{name}")
    }
}

/// Error types that can occur when talking to the Gemini API.
#[derive(Debug, Error)]
pub enum LLMError {
    /// Missing API key or unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// Temporary server-side failure that is worth retrying
    #[error("Transient service error{}: {message}", status_suffix(.status))]
    Transient {
        status: Option<u16>,
        message: String,
    },
    /// Request refused by the service
    #[error("Request {category} (HTTP {status}): {message}")]
    Request {
        status: u16,
        category: RequestCategory,
        message: String,
    },
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// Local filesystem errors (scratch files, attachments)
    #[error("IO error: {0}")]
    Io(String),
    /// Retry attempts exceeded
    #[error("Retry attempts exceeded after {attempts} tries: {last_error}")]
    RetryExceeded {
        attempts: usize,
        #[source]
        last_error: Box<LLMError>,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl LLMError {
    /// Builds the error for a non-success HTTP status and its response body.
    ///
    /// Gemini error bodies look like `{"error":{"code":503,"message":..,"status":"UNAVAILABLE"}}`;
    /// anything else is kept verbatim as the message.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| api_error_message(&value))
            .unwrap_or_else(|| body.trim().to_string());
        Self::classify(Some(status), message)
    }

    /// Builds the error carried inside a response payload (for example a
    /// stream event), if the payload has an `error` object.
    pub fn from_payload(value: &Value) -> Option<Self> {
        let error = value.get("error")?;
        let status = error
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok());
        let message = api_error_message(value).unwrap_or_else(|| error.to_string());
        Some(Self::classify(status, message))
    }

    fn classify(status: Option<u16>, message: String) -> Self {
        if status.is_some_and(|s| TRANSIENT_STATUSES.contains(&s)) || mentions_unavailable(&message)
        {
            return LLMError::Transient { status, message };
        }
        match status {
            Some(status) => LLMError::Request {
                status,
                category: RequestCategory::classify(status, &message),
                message,
            },
            None => LLMError::ResponseFormatError {
                message: "service reported an error".to_string(),
                raw_response: message,
            },
        }
    }

    /// Whether the failure is temporary and the operation may be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            LLMError::Transient { .. } => true,
            LLMError::HttpError(message) => mentions_unavailable(message),
            _ => false,
        }
    }

    /// Short name of the failure kind, used in user-facing notices.
    pub fn kind(&self) -> &'static str {
        match self {
            LLMError::Config(_) => "ConfigurationError",
            LLMError::Transient { .. } => "TransientServiceError",
            LLMError::Request { .. } => "NonTransientRequestError",
            LLMError::HttpError(_) => "HttpError",
            LLMError::JsonError(_) => "JsonError",
            LLMError::ResponseFormatError { .. } => "ResponseFormatError",
            LLMError::Io(_) => "IoError",
            LLMError::RetryExceeded { .. } => "RetryExceeded",
        }
    }

    /// Message suitable for showing to the person chatting.
    pub fn friendly_message(&self) -> &'static str {
        match self {
            LLMError::Config(_) => {
                "The API key is missing. Set GEMINI_API_KEY or store one with `gemini-chat set-key`."
            }
            LLMError::Request {
                category: RequestCategory::RateLimited,
                ..
            } => "This model is currently rate-limited. Try again in a moment or switch models.",
            LLMError::Transient { .. } | LLMError::RetryExceeded { .. } => {
                "Service is temporarily unavailable. Retrying later usually helps."
            }
            LLMError::Request {
                category: RequestCategory::InvalidRequest,
                ..
            } => "The request wasn't accepted. Please simplify the prompt or try a different file.",
            _ => "The model is unavailable at the moment.",
        }
    }
}

fn api_error_message(value: &Value) -> Option<String> {
    let error = value.get("error")?;
    let message = error.get("message").and_then(Value::as_str)?;
    match error.get("status").and_then(Value::as_str) {
        Some(status) => Some(format!("{status}: {message}")),
        None => Some(message.to_string()),
    }
}

fn mentions_unavailable(message: &str) -> bool {
    message.to_lowercase().contains(UNAVAILABLE_MARKER)
}

/// Converts reqwest HTTP errors into LLMErrors
impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            return LLMError::Transient {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            };
        }
        match err.status() {
            Some(status) => LLMError::from_status(status.as_u16(), &err.to_string()),
            None => LLMError::HttpError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for LLMError {
    fn from(err: serde_json::Error) -> Self {
        LLMError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

impl From<std::io::Error> for LLMError {
    fn from(err: std::io::Error) -> Self {
        LLMError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        for status in [500, 502, 503, 504] {
            assert!(LLMError::from_status(status, "boom").is_transient());
        }
    }

    #[test]
    fn unavailable_message_is_transient_without_5xx() {
        let err = LLMError::from_status(
            400,
            r#"{"error":{"code":400,"message":"backend busy","status":"UNAVAILABLE"}}"#,
        );
        assert!(err.is_transient());
    }

    #[test]
    fn rate_limit_is_not_transient() {
        let err = LLMError::from_status(
            429,
            r#"{"error":{"code":429,"message":"quota","status":"RESOURCE_EXHAUSTED"}}"#,
        );
        assert!(!err.is_transient());
        assert!(matches!(
            err,
            LLMError::Request {
                status: 429,
                category: RequestCategory::RateLimited,
                ..
            }
        ));
        assert!(err.friendly_message().contains("rate-limited"));
    }

    #[test]
    fn bad_request_keeps_diagnostic_text() {
        let err = LLMError::from_status(
            400,
            r#"{"error":{"code":400,"message":"Unsupported MIME type","status":"INVALID_ARGUMENT"}}"#,
        );
        assert!(err.to_string().contains("Unsupported MIME type"));
        assert_eq!(err.kind(), "NonTransientRequestError");
        assert!(err.friendly_message().contains("wasn't accepted"));
    }

    #[test]
    fn non_json_body_is_kept_verbatim() {
        let err = LLMError::from_status(502, "Bad Gateway\n");
        match err {
            LLMError::Transient { status, message } => {
                assert_eq!(status, Some(502));
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn payload_error_is_detected() {
        let value: Value = serde_json::from_str(
            r#"{"error":{"code":503,"message":"overloaded","status":"UNAVAILABLE"}}"#,
        )
        .unwrap();
        let err = LLMError::from_payload(&value).unwrap();
        assert!(err.is_transient());
        assert!(LLMError::from_payload(&serde_json::json!({"text": "hi"})).is_none());
    }

    #[test]
    fn retry_exceeded_reports_last_error() {
        let err = LLMError::RetryExceeded {
            attempts: 4,
            last_error: Box::new(LLMError::from_status(503, "Service Unavailable")),
        };
        let text = err.to_string();
        assert!(text.contains("4 tries"));
        assert!(text.contains("Service Unavailable"));
        assert!(err.friendly_message().contains("temporarily unavailable"));
    }
}
