//! Result states handed to a view layer.
//!
//! The client never renders anything. A view keeps a `ViewState` per
//! screen and derives it from the outcome of one client call; the
//! `Notice` attached to a failure is the only user-facing text this crate
//! produces.

use crate::error::ClientError;

/// Text shown when the server could not be reached.
pub const OFFLINE_NOTICE: &str = "Tidak dapat terhubung ke server. Periksa koneksi Anda.";
/// Text shown for defects the user cannot fix.
pub const INTERNAL_NOTICE: &str = "Terjadi kesalahan. Silakan coba lagi.";

/// What a screen bound to one client call should display.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    /// The call succeeded with an empty collection.
    Empty,
    Ready(T),
    Failed(Notice),
}

impl<T> ViewState<T> {
    pub fn from_result(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => ViewState::Ready(value),
            Err(e) => ViewState::Failed(Notice::from(&e)),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

impl<T> ViewState<Vec<T>> {
    /// Like `from_result`, but an empty collection becomes `Empty`.
    pub fn from_list(result: Result<Vec<T>, ClientError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => ViewState::Empty,
            other => ViewState::from_result(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The server refused; its message is shown as-is.
    Rejected,
    Offline,
    Internal,
}

/// A user-facing failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl From<&ClientError> for Notice {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::ServerRejected { message, .. } => Notice {
                kind: NoticeKind::Rejected,
                text: message.clone(),
            },
            ClientError::NoResponse { .. } => Notice {
                kind: NoticeKind::Offline,
                text: OFFLINE_NOTICE.to_string(),
            },
            ClientError::RequestSetupFailed { .. } | ClientError::InvalidPayload { .. } => Notice {
                kind: NoticeKind::Internal,
                text: INTERNAL_NOTICE.to_string(),
            },
        }
    }
}
