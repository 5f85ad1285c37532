//! Remote catalog error types.

use thiserror::Error;

/// Failures surfaced by the remote photo and breed APIs.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request exceeded its configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connectivity or transport failure before a response arrived.
    #[error("network error: {message}")]
    Network {
        /// Transport-level description.
        message: String,
    },

    /// The server answered with a non-success status code.
    #[error("unexpected HTTP status {status}")]
    Http {
        /// The status code as returned by the server.
        status: u16,
    },

    /// The response body could not be parsed into the expected shape.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Parser description of what went wrong.
        message: String,
    },

    /// The requested record does not exist upstream.
    #[error("record not found: {id}")]
    NotFound {
        /// Identifier that produced no record.
        id: String,
    },
}

impl ApiError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub const fn http(status: u16) -> Self {
        Self::Http { status }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Returns whether the error came from the transport rather than the
    /// payload.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network { .. } | Self::Http { .. })
    }

    /// Returns whether retrying the same request later could succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout | Self::Network { .. } => true,
            Self::Http { status } => *status >= 500 || *status == 429,
            Self::Decode { .. } | Self::NotFound { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(ApiError::Timeout.is_network_error());
        assert!(ApiError::network("refused").is_recoverable());
        assert!(ApiError::http(503).is_recoverable());
        assert!(!ApiError::http(404).is_recoverable());
        assert!(!ApiError::decode("bad json").is_network_error());
        assert!(!ApiError::not_found("abc").is_recoverable());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = ApiError::http(502);
        assert_eq!(err.to_string(), "unexpected HTTP status 502");
        let err = ApiError::not_found("xyz");
        assert!(err.to_string().contains("xyz"));
    }
}
