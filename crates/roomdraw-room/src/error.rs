//! Error types for the room layer.

use roomdraw_protocol::{Account, ErrorCode, ErrorReport, RoomId};

use crate::{RoomState, TransferError};

/// Errors that can occur during room operations.
///
/// Every variant is a rejected operation: the room that produced it is
/// left exactly as it was before the operation was attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The operation is not valid in the room's current state.
    /// For example, entering a room whose round has not been started.
    #[error("room {0} is {1}, operation requires an open round")]
    RoomNotActive(RoomId, RoomState),

    /// `start` on a room whose round is already open.
    #[error("room {0} already has an open round")]
    AlreadyOpen(RoomId),

    /// The account already entered the current round.
    #[error("account {0} already entered the current round")]
    DuplicateEntry(Account),

    /// The stake is zero, below the configured minimum, malformed, or
    /// would overflow the pool.
    #[error("invalid stake: {0}")]
    InvalidStake(String),

    /// `end` on a round nobody entered.
    #[error("no entrants to draw from")]
    NoEntrants,

    /// The payout to the drawn winner was refused.
    #[error("payout to {0} failed: {1}")]
    TransferFailed(Account, TransferError),
}

impl RoomError {
    /// The stable wire code for this rejection.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::RoomNotFound(_) => ErrorCode::RoomNotFound,
            Self::RoomNotActive(..) => ErrorCode::RoomNotActive,
            Self::AlreadyOpen(_) => ErrorCode::AlreadyOpen,
            Self::DuplicateEntry(_) => ErrorCode::DuplicateEntry,
            Self::InvalidStake(_) => ErrorCode::InvalidStake,
            Self::NoEntrants => ErrorCode::NoEntrants,
            Self::TransferFailed(..) => ErrorCode::TransferFailed,
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
