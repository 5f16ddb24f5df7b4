//! Unified error type for Roomdraw.

use roomdraw_protocol::{ErrorCode, ErrorReport, ProtocolError};
use roomdraw_room::RoomError;
use roomdraw_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `roomdraw` crate you deal with this single error type
/// instead of importing errors from each sub-crate. `#[from]` lets `?`
/// convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RoomdrawError {
    /// Encoding, decoding, or parsing a value.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room rejected the operation.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The caller's context cannot act, or cannot act as the named account.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl RoomdrawError {
    /// The stable wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Protocol(_) => ErrorCode::InvalidMessage,
            Self::Room(e) => e.code(),
            Self::Session(SessionError::WrongNetwork { .. }) => ErrorCode::WrongNetwork,
            Self::Session(SessionError::AccountMismatch { .. }) => ErrorCode::AccountMismatch,
            Self::Session(_) => ErrorCode::NotConnected,
        }
    }

    /// Converts the error into the report sent back to remote callers.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
        }
    }
}
