//! Error types returned by every carrier operation.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`CarrierError`], for callers that only need
/// to branch on where a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The session does not satisfy the call's precondition (no token, no waybill).
    Unauthenticated,
    /// The request never produced a response (network, timeout, bad URL).
    Transport,
    /// The carrier answered with a non-success status.
    Service,
    /// The response could not be decoded or the label could not be written.
    Local,
}

#[derive(Debug, Error)]
pub enum CarrierError {
    #[error("not authenticated: login must succeed before this call")]
    Unauthenticated,

    #[error("no waybill in session: create a waybill before fetching its label")]
    MissingWaybill,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("transport error: {0}")]
    Transport(#[from] wreq::Error),

    /// Non-success status. `body` holds the structured error payload when the
    /// service sent JSON, otherwise the raw text.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: serde_json::Value,
    },

    #[error("unexpected response from {endpoint}: {reason}")]
    InvalidResponse {
        endpoint: &'static str,
        reason: String,
    },

    #[error("label document is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("failed to write label to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CarrierError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated | Self::MissingWaybill => ErrorKind::Unauthenticated,
            Self::Url(_) | Self::Transport(_) => ErrorKind::Transport,
            Self::Status { .. } => ErrorKind::Service,
            Self::InvalidConfig(_)
            | Self::InvalidResponse { .. }
            | Self::Decode(_)
            | Self::Write { .. } => ErrorKind::Local,
        }
    }

    /// HTTP status for [`CarrierError::Status`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CarrierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(CarrierError::Unauthenticated.kind(), ErrorKind::Unauthenticated);
        assert_eq!(CarrierError::MissingWaybill.kind(), ErrorKind::Unauthenticated);

        let status = CarrierError::Status {
            endpoint: "/Awbs",
            status: 500,
            body: serde_json::json!({"message": "boom"}),
        };
        assert_eq!(status.kind(), ErrorKind::Service);
        assert_eq!(status.status(), Some(500));

        let io = CarrierError::Write {
            path: PathBuf::from("AWB1.pdf"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(io.kind(), ErrorKind::Local);
        assert_eq!(io.status(), None);
        assert!(io.to_string().contains("AWB1.pdf"));
    }

    #[test]
    fn test_status_display_includes_body() {
        let err = CarrierError::Status {
            endpoint: "/LoginUser",
            status: 401,
            body: serde_json::Value::String("Invalid credentials".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "/LoginUser returned 401: \"Invalid credentials\""
        );
    }
}
