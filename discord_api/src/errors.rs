//! Error types for the API client.
//!
//! [`HttpFailure`] is the closed set of HTTP-layer failures a caller can
//! branch on. [`Error`] wraps it together with the transport failures that
//! never produced a response.

use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use url::Url;

const UNAUTHORIZED_MESSAGE: &str = "401 Unauthorized: missing or invalid access token";
const ACCESS_DENIED_MESSAGE: &str = "access denied: the user declined the authorization request";

/// Maximum number of body bytes kept in a generic failure message.
const MAX_BODY_SNIPPET: usize = 2000;

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response (network error, timeout, bad URL).
    #[error("Request failed")]
    RequestFailed,
    /// A success response whose body did not match the expected shape.
    #[error("Failed to decode response body")]
    Decode { body: String },
    /// The API answered with a failure status.
    #[error(transparent)]
    Http(#[from] HttpFailure),
}

impl Error {
    /// The HTTP failure behind this error, if the API responded at all.
    pub fn as_http(&self) -> Option<&HttpFailure> {
        match self {
            Self::Http(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Owned snapshot of a finished HTTP response.
///
/// The body has already been read, so the snapshot can be inspected any
/// number of times after the connection is gone.
#[derive(Debug)]
pub struct ResponseParts {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: Url,
    pub text: String,
}

impl ResponseParts {
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url, text: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            url,
            text: text.into(),
        }
    }

    /// Reads the body of a `reqwest` response and keeps it with the metadata.
    pub async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let text = response.text().await?;
        Ok(Self {
            status,
            headers,
            url,
            text,
        })
    }

    /// Parses the body as a JSON object.
    pub fn json_object(&self) -> Result<Map<String, Value>, serde_json::Error> {
        serde_json::from_str(&self.text)
    }
}

/// An HTTP-layer failure, classified by cause.
#[derive(thiserror::Error, Debug)]
pub enum HttpFailure {
    /// Any failure that is not one of the more specific variants.
    #[error("{message}")]
    Generic {
        status: Option<StatusCode>,
        message: String,
    },
    /// The API is throttling this client (HTTP 429).
    #[error("{0}")]
    RateLimited(RateLimited),
    /// Credentials are missing or no longer valid (HTTP 401).
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,
    /// The user declined the OAuth consent screen.
    #[error("{}", ACCESS_DENIED_MESSAGE)]
    AccessDenied,
}

impl HttpFailure {
    /// Passes successful responses through and turns everything else into
    /// the matching failure variant.
    pub fn classify(response: ResponseParts) -> Result<ResponseParts, HttpFailure> {
        let status = response.status;
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Self::RateLimited(RateLimited::new(response)));
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(Self::Unauthorized);
        }

        let mut message = status_line(status);
        if !response.text.trim().is_empty() {
            message.push_str(": ");
            message.push_str(&truncate_body(&response.text));
        }
        Err(Self::Generic {
            status: Some(status),
            message,
        })
    }

    /// Builds a generic failure that did not come from a response status.
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            status: None,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Generic { message, .. } => message,
            Self::RateLimited(limited) => limited.message(),
            Self::Unauthorized => UNAUTHORIZED_MESSAGE,
            Self::AccessDenied => ACCESS_DENIED_MESSAGE,
        }
    }

    /// The response status behind the failure, when there was a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Generic { status, .. } => *status,
            Self::RateLimited(limited) => Some(limited.response().status),
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::AccessDenied => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied)
    }
}

/// Retry timing reported in a well-formed rate limit body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryHints {
    /// Whether the limit applies to the whole application rather than one route.
    pub global: bool,
    pub retry_after_ms: u64,
}

impl RetryHints {
    pub fn retry_after(&self) -> Duration {
        Duration::from_millis(self.retry_after_ms)
    }
}

/// Details of a 429 response.
///
/// When the body is a JSON object carrying `message`, `global` and
/// `retry_after`, those fields are exposed directly. Any other body keeps
/// its raw text as the message and carries no retry hints.
#[derive(Debug)]
pub struct RateLimited {
    response: ResponseParts,
    json: Map<String, Value>,
    message: String,
    hints: Option<RetryHints>,
}

impl RateLimited {
    pub fn new(response: ResponseParts) -> Self {
        match parse_rate_limit_body(&response) {
            Some((json, message, hints)) => Self {
                response,
                json,
                message,
                hints: Some(hints),
            },
            None => {
                let message = if response.text.trim().is_empty() {
                    status_line(response.status)
                } else {
                    response.text.clone()
                };
                Self {
                    response,
                    json: Map::new(),
                    message,
                    hints: None,
                }
            }
        }
    }

    /// The response that triggered the failure.
    pub fn response(&self) -> &ResponseParts {
        &self.response
    }

    /// The parsed body, or an empty map if the body was not usable JSON.
    pub fn json(&self) -> &Map<String, Value> {
        &self.json
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hints(&self) -> Option<RetryHints> {
        self.hints
    }

    pub fn is_global(&self) -> Option<bool> {
        self.hints.map(|h| h.global)
    }

    pub fn retry_after_ms(&self) -> Option<u64> {
        self.hints.map(|h| h.retry_after_ms)
    }

    pub fn into_response(self) -> ResponseParts {
        self.response
    }
}

impl fmt::Display for RateLimited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn parse_rate_limit_body(
    response: &ResponseParts,
) -> Option<(Map<String, Value>, String, RetryHints)> {
    let json = match response.json_object() {
        Ok(json) => json,
        Err(e) => {
            tracing::debug!("Rate limit body is not a JSON object: {}", e);
            return None;
        }
    };
    let message = json.get("message")?.as_str()?.to_string();
    let global = json.get("global")?.as_bool()?;
    let retry_after_ms = retry_after_millis(json.get("retry_after")?)?;
    if message.is_empty() {
        return None;
    }
    Some((
        json,
        message,
        RetryHints {
            global,
            retry_after_ms,
        },
    ))
}

/// Integer values are milliseconds. Non-integer values are seconds, as sent
/// by newer API versions.
fn retry_after_millis(value: &Value) -> Option<u64> {
    if let Some(ms) = value.as_u64() {
        return Some(ms);
    }
    let secs = value.as_f64()?;
    if secs.is_finite() && secs >= 0.0 {
        // Rounded, since `0.1 * 1000.0` is not exactly 100.
        Some((secs * 1000.0).round() as u64)
    } else {
        None
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_BODY_SNIPPET {
        return body.to_string();
    }
    let mut end = MAX_BODY_SNIPPET;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
