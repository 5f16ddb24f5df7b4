//! The operation contract: what callers may ask of a room and what they
//! get back.
//!
//! Every type here is plain data. The room core consumes [`Operation`]s and
//! produces [`Outcome`]s and [`Notification`]s; [`Request`] and
//! [`Response`] wrap them with a sequence number for callers that ship
//! them over a codec.

use serde::{Deserialize, Serialize};

use crate::{Account, Amount, RoomId};

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// A single operation addressed to one room.
///
/// `#[serde(tag = "op")]` produces internally tagged JSON:
///   `{ "op": "Enter", "account": "0x…", "stake": "100000000000000000" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Operation {
    /// Create the room if absent, otherwise attach to it.
    CreateOrJoin,
    /// Open a new round.
    Start,
    /// Stake funds into the open round.
    Enter { account: Account, stake: Amount },
    /// Draw a winner and pay out the pool.
    End,
    /// Current entrants, in entry order.
    Players,
    /// Current pooled balance.
    Balance,
    /// Most recently drawn winner.
    Winner,
    /// Every past winner, oldest first.
    History,
}

impl Operation {
    /// Returns `true` for operations that may change room state.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::CreateOrJoin | Self::Start | Self::Enter { .. } | Self::End
        )
    }

    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateOrJoin => "create_or_join",
            Self::Start => "start",
            Self::Enter { .. } => "enter",
            Self::End => "end",
            Self::Players => "players",
            Self::Balance => "balance",
            Self::Winner => "winner",
            Self::History => "history",
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// One entry of the current round: who staked, and how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    pub account: Account,
    pub stake: Amount,
}

/// The typed result of a successful [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum Outcome {
    /// `CreateOrJoin` succeeded. `created` is `false` when the room
    /// already existed.
    Joined { created: bool },
    /// `Start` opened round number `round` (1-based).
    Opened { round: u64 },
    /// `Enter` succeeded; `balance` is the pool after the credit.
    Entered { balance: Amount },
    /// `End` completed round `round`, paying `payout` to `winner`.
    Drawn {
        round: u64,
        winner: Account,
        payout: Amount,
    },
    Players { entrants: Vec<Entrant> },
    Balance { balance: Amount },
    Winner { winner: Option<Account> },
    History { winners: Vec<Account> },
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// An event published after a mutating operation commits.
///
/// Failed operations never produce notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Notification {
    RoomCreated {
        room_id: RoomId,
    },
    RoundOpened {
        room_id: RoomId,
        round: u64,
    },
    EntrantJoined {
        room_id: RoomId,
        account: Account,
        stake: Amount,
        balance: Amount,
    },
    WinnerDrawn {
        room_id: RoomId,
        round: u64,
        winner: Account,
        payout: Amount,
    },
}

impl Notification {
    /// The room this event belongs to.
    pub fn room_id(&self) -> RoomId {
        match self {
            Self::RoomCreated { room_id }
            | Self::RoundOpened { room_id, .. }
            | Self::EntrantJoined { room_id, .. }
            | Self::WinnerDrawn { room_id, .. } => *room_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors on the wire
// ---------------------------------------------------------------------------

/// Stable, machine-readable rejection codes.
///
/// Callers match on these instead of on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    RoomNotFound,
    RoomNotActive,
    AlreadyOpen,
    DuplicateEntry,
    InvalidStake,
    NoEntrants,
    TransferFailed,
    /// The caller's wallet is on another network.
    WrongNetwork,
    /// The caller has no active account.
    NotConnected,
    /// The caller tried to act as an account other than their own.
    AccountMismatch,
    /// The request could not be decoded.
    InvalidMessage,
}

/// A rejected operation as seen by a remote caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Request / Response envelopes
// ---------------------------------------------------------------------------

/// An operation plus the caller's sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Echoed back in the matching [`Response`].
    pub seq: u64,
    pub room_id: RoomId,
    pub operation: Operation,
}

/// The answer to a [`Request`] with the same `seq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub seq: u64,
    pub result: Result<Outcome, ErrorReport>,
}
