//! Shared error type across metgrid crates.

use thiserror::Error;

/// Stable error codes (used in logs and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid configuration or CLI input.
    BadConfig,
    /// Network / transport failure talking to the metrics server.
    Transport,
    /// Metrics server answered with a non-success status.
    UpstreamStatus,
    /// Response body did not match the expected payload.
    Decode,
    /// Internal failure.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::UpstreamStatus => "UPSTREAM_STATUS",
            ErrorCode::Decode => "DECODE",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetGridError>;

/// Unified error type used by core, dashboard and collector.
#[derive(Debug, Error)]
pub enum MetGridError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),
    #[error("decode: {0}")]
    Decode(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MetGridError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MetGridError::BadConfig(_) => ErrorCode::BadConfig,
            MetGridError::Transport(_) => ErrorCode::Transport,
            MetGridError::UpstreamStatus(_) => ErrorCode::UpstreamStatus,
            MetGridError::Decode(_) => ErrorCode::Decode,
            MetGridError::Internal(_) => ErrorCode::Internal,
        }
    }
}
