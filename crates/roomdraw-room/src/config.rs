//! Room configuration and state machine.

use roomdraw_protocol::Amount;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration applied to every room a registry creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Smallest stake `enter` accepts. Zero stakes are always rejected,
    /// so the effective floor is `max(min_stake, 1 wei)`.
    pub min_stake: Amount,

    /// What `winner` reports once a new round opens.
    pub winner_retention: WinnerRetention,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_stake: Amount::from_wei(1),
            winner_retention: WinnerRetention::default(),
        }
    }
}

/// Policy for the "current winner" slot across rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinnerRetention {
    /// The last drawn winner stays visible until the next draw replaces
    /// it, including while the following round is open.
    #[default]
    KeepLastWinner,
    /// `start` clears the winner; it is only set between a draw and the
    /// next `start`.
    ClearOnStart,
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
///            start          end
///   Idle ─────────→ Open ─────────→ Settled
///                    ↑                 │
///                    └──── start ──────┘
/// ```
///
/// - **Idle**: the room exists but no round has ever been opened.
/// - **Open**: a round is accepting entrants.
/// - **Settled**: the last round was drawn and paid out. The room waits
///   for an explicit `start` before accepting entrants again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Idle,
    Open,
    Settled,
}

impl RoomState {
    /// Returns `true` if the room accepts entrants and can be drawn.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Open)
                | (Self::Open, Self::Settled)
                | (Self::Settled, Self::Open)
        )
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Open => write!(f, "Open"),
            Self::Settled => write!(f, "Settled"),
        }
    }
}
