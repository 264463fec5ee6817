use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_MESSAGE: &str = "Erro desconhecido";
pub const FALLBACK_STATUS: u16 = 500;

/// Where a failure came from. Carried for logging; callers only need
/// `message` and `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection, DNS or TLS failure.
    Transport,
    Timeout,
    /// Non-2xx response.
    Upstream,
    /// 2xx response whose body did not match any known shape.
    Decode,
}

/// Uniform failure shape surfaced by every client call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// Upstream HTTP status, or 500 when there was none.
    pub status: u16,
    pub kind: ErrorKind,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Normalize a non-2xx response.
    ///
    /// The upstream `message` field wins when present; otherwise the
    /// message names the status code.
    pub fn from_upstream(status: u16, body: &[u8]) -> Self {
        let upstream_message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());
        Self {
            message: upstream_message
                .unwrap_or_else(|| format!("Request failed with status code {status}")),
            status,
            kind: ErrorKind::Upstream,
        }
    }

    /// Normalize a transport failure. Timeouts name the configured budget.
    pub fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return Self {
                message: format!("timeout of {}ms exceeded", timeout.as_millis()),
                status: FALLBACK_STATUS,
                kind: ErrorKind::Timeout,
            };
        }
        let message = err.to_string();
        Self {
            message: if message.is_empty() {
                DEFAULT_MESSAGE.to_string()
            } else {
                message
            },
            status: err.status().map_or(FALLBACK_STATUS, |s| s.as_u16()),
            kind: ErrorKind::Transport,
        }
    }

    /// Normalize a body that could not be decoded.
    pub fn from_decode(err: &serde_json::Error) -> Self {
        Self {
            message: format!("invalid response body: {err}"),
            status: FALLBACK_STATUS,
            kind: ErrorKind::Decode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_preferred() {
        let err = ApiError::from_upstream(404, br#"{"message":"not found"}"#);
        assert_eq!(err.message, "not found");
        assert_eq!(err.status, 404);
        assert_eq!(err.kind, ErrorKind::Upstream);
    }

    #[test]
    fn upstream_without_message_names_status() {
        let err = ApiError::from_upstream(503, b"<html>Service Unavailable</html>");
        assert_eq!(err.message, "Request failed with status code 503");
        assert_eq!(err.status, 503);
    }

    #[test]
    fn upstream_blank_message_ignored() {
        let err = ApiError::from_upstream(400, br#"{"message":"  ","error":"Bad Request"}"#);
        assert_eq!(err.message, "Request failed with status code 400");
    }

    #[test]
    fn decode_error_is_500() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ApiError::from_decode(&json_err);
        assert_eq!(err.status, 500);
        assert!(err.message.starts_with("invalid response body"));
    }

    #[test]
    fn display_is_message() {
        let body = r#"{"message":"Pessoa não encontrada"}"#;
        let err = ApiError::from_upstream(404, body.as_bytes());
        assert_eq!(err.to_string(), "Pessoa não encontrada");
    }
}
