//! Error types for site evaluation.
//!
//! Two layers, kept deliberately apart:
//!
//! - [`CheckException`]: a per-item failure (one URL could not be resolved,
//!   fetched, parsed, ...). Checks catch these and store them inside their
//!   result records. They never abort a pipeline run.
//! - [`PipelineError`]: a fatal problem with the run itself, usually a check
//!   that needed evidence an earlier check did not produce. The pipeline
//!   driver propagates these unchanged and the run for that input URL stops.
//!
//! # Example
//!
//! ```rust
//! use siterate::errors::{CheckException, ExceptionKind};
//!
//! let exc = CheckException::new(ExceptionKind::ReadTimeout, "no response after 20s");
//! assert!(exc.is_retryable());
//! assert_eq!(exc.kind.as_str(), "read_timeout");
//! ```

use crate::results::CheckName;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a per-item failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    /// TCP connection could not be established or was reset
    Connection,
    /// Connecting took longer than the connect timeout
    ConnectionTimeout,
    /// The server accepted the connection but did not answer in time
    ReadTimeout,
    /// Name resolution failed
    Dns,
    /// TLS handshake or certificate retrieval failed
    Tls,
    /// A redirect chain ended on a host that is not the site itself
    BadTargetDomain,
    /// Markup, feed or URL could not be interpreted
    Parse,
    /// The capability is not available in this environment
    Unavailable,
    /// Anything else
    Other,
}

impl ExceptionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::ConnectionTimeout => "connection_timeout",
            Self::ReadTimeout => "read_timeout",
            Self::Dns => "dns",
            Self::Tls => "tls",
            Self::BadTargetDomain => "bad_target_domain",
            Self::Parse => "parse",
            Self::Unavailable => "unavailable",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified per-item failure, stored in the `exception` field of result records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckException {
    #[serde(rename = "type")]
    pub kind: ExceptionKind,
    pub message: String,
}

impl CheckException {
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::Connection, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::Parse, message)
    }

    pub fn unavailable(capability: &str) -> Self {
        Self::new(
            ExceptionKind::Unavailable,
            format!("{} is not available in this environment", capability),
        )
    }

    /// Timeouts are the only failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ExceptionKind::ConnectionTimeout | ExceptionKind::ReadTimeout
        )
    }
}

impl fmt::Display for CheckException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for CheckException {}

/// Fatal errors that abort a pipeline run for one input URL.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A check needed a result entry that an earlier check should have produced
    #[error("check {check} requires {dependency} results for {url}, but none were recorded")]
    MissingResult {
        check: CheckName,
        dependency: CheckName,
        url: String,
    },

    /// The input URL cannot seed a working set
    #[error("invalid input URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The pipeline or rating engine is wired inconsistently
    #[error("pipeline misconfigured: {0}")]
    Misconfigured(String),

    /// A collaborator could not be constructed
    #[error("collaborator setup failed: {0}")]
    Collaborator(String),
}

impl PipelineError {
    pub fn missing_result(check: CheckName, dependency: CheckName, url: impl Into<String>) -> Self {
        Self::MissingResult {
            check,
            dependency,
            url: url.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_serializes_with_type_field() {
        let exc = CheckException::connection("refused");
        let json = serde_json::to_value(&exc).unwrap();
        assert_eq!(json["type"], "connection");
        assert_eq!(json["message"], "refused");
    }

    #[test]
    fn test_only_timeouts_are_retryable() {
        assert!(CheckException::new(ExceptionKind::ConnectionTimeout, "x").is_retryable());
        assert!(CheckException::new(ExceptionKind::ReadTimeout, "x").is_retryable());
        assert!(!CheckException::connection("x").is_retryable());
        assert!(!CheckException::unavailable("browser").is_retryable());
    }

    #[test]
    fn test_missing_result_message_names_both_checks() {
        let err = PipelineError::missing_result(
            CheckName::Charset,
            CheckName::PageContent,
            "http://example.com/",
        );
        let msg = err.to_string();
        assert!(msg.contains("charset"));
        assert!(msg.contains("page_content"));
        assert!(msg.contains("http://example.com/"));
    }
}
