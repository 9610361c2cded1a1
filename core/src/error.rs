//! Error taxonomy for the resource client.
//!
//! # Design
//! Every failure is classified into one of a few variants so a view layer
//! can pick a message without looking at transport internals:
//! the server answered with a non-2xx status (`ServerRejected`), the request
//! went out but nothing came back (`NoResponse`), or the request never left
//! (`RequestSetupFailed`). `InvalidPayload` covers a 2xx answer whose body
//! does not decode into the expected envelope.

use thiserror::Error;

/// Message carried by `ServerRejected` when the error body has no `message`.
pub const GENERIC_FAILURE_MESSAGE: &str = "operation failed";

/// Errors returned by every `ResourceClient` operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    ///
    /// `message` is the body's `message` field verbatim, or
    /// [`GENERIC_FAILURE_MESSAGE`] when the body has none.
    #[error("server rejected request with status {status}: {message}")]
    ServerRejected { status: u16, message: String },

    /// The request was dispatched but no response arrived.
    #[error("no response from server: {reason}")]
    NoResponse { reason: String },

    /// The request could not be constructed or handed to the transport.
    #[error("request setup failed: {reason}")]
    RequestSetupFailed { reason: String },

    /// A 2xx response whose body is not the expected envelope.
    #[error("invalid payload in {status} response: {reason}")]
    InvalidPayload { status: u16, reason: String },
}

impl ClientError {
    pub(crate) fn setup(reason: impl Into<String>) -> Self {
        ClientError::RequestSetupFailed {
            reason: reason.into(),
        }
    }

    /// Whether retrying or correcting input can succeed.
    ///
    /// Setup and payload failures are defects in the client or its
    /// configuration; repeating the call yields the same result.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClientError::ServerRejected { .. } | ClientError::NoResponse { .. }
        )
    }

    /// HTTP status attached to the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ServerRejected { status, .. } | ClientError::InvalidPayload { status, .. } => {
                Some(*status)
            }
            ClientError::NoResponse { .. } | ClientError::RequestSetupFailed { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::ServerRejected { status: 404, .. })
    }
}

/// Failure reported by a `Transport` before any HTTP status was seen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be built or sent.
    #[error("{0}")]
    Setup(String),

    /// The request was sent; the connection failed, timed out or closed
    /// before a complete response arrived.
    #[error("{0}")]
    NoResponse(String),
}

impl From<TransportError> for ClientError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Setup(reason) => ClientError::RequestSetupFailed { reason },
            TransportError::NoResponse(reason) => ClientError::NoResponse { reason },
        }
    }
}
