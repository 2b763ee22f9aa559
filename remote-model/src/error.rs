use alloc::string::String;

use crate::RequestId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransportErrorKind {
    /// The server could not be reached.
    Network,
    Timeout,
    /// The server answered with an error status.
    Http,
    /// The body could not be decoded. Hosts often see this when a session expired and a login
    /// page came back instead of JSON.
    Parse,
}

impl TransportErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "error",
            Self::Timeout => "timeout",
            Self::Http => "http",
            Self::Parse => "parsererror",
        }
    }
}

/// A real request failure, as reported by the transport.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{} (status {status:?}): {detail}", .kind.as_str())]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub status: Option<u16>,
    /// Diagnostic detail, typically the raw response body.
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, status: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed `[from, to)` input. Never reaches the network.
    #[error("invalid row range [{from}, {to}): `from` must be non-negative and below `to`")]
    InvalidRange { from: i64, to: i64 },
    /// The request was superseded or aborted; its payload is stale.
    #[error("request {0} was cancelled")]
    Cancelled(RequestId),
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}
