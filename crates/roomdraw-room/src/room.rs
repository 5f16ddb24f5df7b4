//! Room: one isolated, reusable lottery.
//!
//! A room composes a [`PlayerLedger`], a [`Treasury`] and a
//! [`WinnerHistory`] and runs them through the [`RoomState`] machine.
//!
//! # Atomicity
//!
//! Every mutating operation checks everything that can fail before it
//! touches any part of the room, so a rejected operation leaves the room
//! exactly as it was. In a draw the payout transfer is the last fallible
//! step; the history, ledger and state updates after it cannot fail.

use roomdraw_protocol::{Account, Amount, Entrant, RoomId};
use serde::{Deserialize, Serialize};

use crate::{
    selector, BlockContext, FundsTransfer, PlayerLedger, RoomConfig, RoomError,
    RoomState, Treasury, WinnerHistory, WinnerRetention,
};

/// The result of a completed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    /// 1-based number of the round that was drawn.
    pub round: u64,
    pub winner: Account,
    pub payout: Amount,
}

/// A read-only snapshot of everything a caller can query about a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub room_id: RoomId,
    pub state: RoomState,
    pub players: Vec<Entrant>,
    pub balance: Amount,
    pub winner: Option<Account>,
    pub history: Vec<Account>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    state: RoomState,
    retention: WinnerRetention,
    ledger: PlayerLedger,
    treasury: Treasury,
    winner: Option<Account>,
    history: WinnerHistory,
}

impl Room {
    /// A fresh room in `Idle`. Only the registry creates rooms.
    pub(crate) fn new(id: RoomId, config: &RoomConfig) -> Self {
        Self {
            id,
            state: RoomState::Idle,
            retention: config.winner_retention,
            ledger: PlayerLedger::new(),
            treasury: Treasury::new(config.min_stake),
            winner: None,
            history: WinnerHistory::new(),
        }
    }

    // -- Queries ----------------------------------------------------------

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    /// Current entrants, in entry order.
    pub fn players(&self) -> &[Entrant] {
        self.ledger.members()
    }

    /// Pooled balance of the current round.
    pub fn balance(&self) -> Amount {
        self.treasury.balance()
    }

    /// The most recent winner, subject to [`WinnerRetention`].
    pub fn winner(&self) -> Option<Account> {
        self.winner
    }

    /// Every past winner, oldest first.
    pub fn history(&self) -> &[Account] {
        self.history.all()
    }

    /// Number of rounds drawn so far.
    pub fn rounds_completed(&self) -> u64 {
        self.history.len() as u64
    }

    pub fn view(&self) -> RoomView {
        RoomView {
            room_id: self.id,
            state: self.state,
            players: self.players().to_vec(),
            balance: self.balance(),
            winner: self.winner,
            history: self.history().to_vec(),
        }
    }

    // -- Mutations --------------------------------------------------------

    /// Opens a round. Returns the 1-based round number.
    pub(crate) fn start(&mut self) -> Result<u64, RoomError> {
        if !self.state.can_transition_to(RoomState::Open) {
            return Err(RoomError::AlreadyOpen(self.id));
        }
        self.state = RoomState::Open;
        if self.retention == WinnerRetention::ClearOnStart {
            self.winner = None;
        }
        Ok(self.rounds_completed() + 1)
    }

    /// Adds an entrant and credits their stake. Returns the new balance.
    pub(crate) fn enter(&mut self, account: Account, stake: Amount) -> Result<Amount, RoomError> {
        self.require_open()?;
        if self.ledger.contains(&account) {
            return Err(RoomError::DuplicateEntry(account));
        }
        self.treasury.check_credit(stake)?;

        self.ledger.enter(account, stake)?;
        self.treasury.credit(stake)
    }

    /// Draws a winner, pays out the pool, records history, clears the
    /// round and settles the room, all or nothing.
    pub(crate) fn end<T: FundsTransfer>(
        &mut self,
        block: &BlockContext,
        transfer: &mut T,
    ) -> Result<Draw, RoomError> {
        self.require_open()?;
        let winner = selector::select(self.ledger.members(), block)?;
        let payout = self.treasury.payout(&winner, transfer)?;

        self.history.append(winner);
        self.ledger.clear();
        self.winner = Some(winner);
        self.state = RoomState::Settled;
        Ok(Draw {
            round: self.rounds_completed(),
            winner,
            payout,
        })
    }

    fn require_open(&self) -> Result<(), RoomError> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(RoomError::RoomNotActive(self.id, self.state))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryBank, TransferError};

    fn acct(b: u8) -> Account {
        Account::new([b; 20])
    }

    fn block() -> BlockContext {
        BlockContext {
            number: 1,
            timestamp: 1,
            prevrandao: [0; 32],
        }
    }

    fn open_room(config: &RoomConfig) -> Room {
        let mut room = Room::new(RoomId(1), config);
        room.start().unwrap();
        room
    }

    #[test]
    fn test_new_room_is_idle_and_empty() {
        let room = Room::new(RoomId(5), &RoomConfig::default());
        assert_eq!(room.state(), RoomState::Idle);
        assert!(room.players().is_empty());
        assert_eq!(room.balance(), Amount::ZERO);
        assert_eq!(room.winner(), None);
        assert!(room.history().is_empty());
    }

    #[test]
    fn test_start_twice_returns_already_open() {
        let mut room = open_room(&RoomConfig::default());
        let before = room.clone();
        assert_eq!(room.start(), Err(RoomError::AlreadyOpen(RoomId(1))));
        assert_eq!(room, before);
    }

    #[test]
    fn test_enter_idle_room_returns_not_active() {
        let mut room = Room::new(RoomId(1), &RoomConfig::default());
        let result = room.enter(acct(1), Amount::from_wei(10));
        assert_eq!(result, Err(RoomError::RoomNotActive(RoomId(1), RoomState::Idle)));
    }

    #[test]
    fn test_enter_invalid_stake_does_not_register_entrant() {
        // A rejected stake must not leave the account in the ledger.
        let mut room = open_room(&RoomConfig::default());
        let before = room.clone();

        let result = room.enter(acct(1), Amount::ZERO);

        assert!(matches!(result, Err(RoomError::InvalidStake(_))));
        assert_eq!(room, before);
        room.enter(acct(1), Amount::from_wei(1)).unwrap();
    }

    #[test]
    fn test_enter_overflowing_stake_leaves_ledger_and_pool_untouched() {
        let mut room = open_room(&RoomConfig::default());
        room.enter(acct(1), Amount::from_wei(u128::MAX)).unwrap();
        let before = room.clone();

        let result = room.enter(acct(2), Amount::from_wei(1));

        assert!(matches!(result, Err(RoomError::InvalidStake(_))));
        assert_eq!(room, before);
        assert_eq!(room.players().len(), 1);
        // The account was never recorded, so it is not a duplicate later.
        assert!(matches!(
            room.enter(acct(2), Amount::from_wei(1)),
            Err(RoomError::InvalidStake(_))
        ));
    }

    #[test]
    fn test_enter_duplicate_checked_before_stake() {
        let mut room = open_room(&RoomConfig::default());
        room.enter(acct(1), Amount::from_wei(10)).unwrap();

        let result = room.enter(acct(1), Amount::ZERO);

        assert_eq!(result, Err(RoomError::DuplicateEntry(acct(1))));
    }

    #[test]
    fn test_end_rejected_payout_changes_nothing() {
        let mut room = open_room(&RoomConfig::default());
        room.enter(acct(1), Amount::from_wei(10)).unwrap();
        let before = room.clone();
        let mut bank = InMemoryBank::new();
        bank.reject_deposits(acct(1));

        let result = room.end(&block(), &mut bank);

        assert_eq!(
            result,
            Err(RoomError::TransferFailed(acct(1), TransferError::Rejected(acct(1))))
        );
        assert_eq!(room, before);
    }

    #[test]
    fn test_end_settles_and_start_opens_next_round() {
        let mut room = open_room(&RoomConfig::default());
        room.enter(acct(1), Amount::from_wei(10)).unwrap();
        let mut bank = InMemoryBank::new();

        let draw = room.end(&block(), &mut bank).unwrap();

        assert_eq!(draw.round, 1);
        assert_eq!(room.state(), RoomState::Settled);
        assert_eq!(room.start(), Ok(2));
        assert_eq!(room.state(), RoomState::Open);
    }

    #[test]
    fn test_keep_last_winner_survives_restart() {
        let mut room = open_room(&RoomConfig::default());
        room.enter(acct(1), Amount::from_wei(10)).unwrap();
        room.end(&block(), &mut InMemoryBank::new()).unwrap();

        room.start().unwrap();

        assert_eq!(room.winner(), Some(acct(1)));
    }

    #[test]
    fn test_clear_on_start_resets_winner() {
        let config = RoomConfig {
            winner_retention: WinnerRetention::ClearOnStart,
            ..RoomConfig::default()
        };
        let mut room = open_room(&config);
        room.enter(acct(1), Amount::from_wei(10)).unwrap();
        room.end(&block(), &mut InMemoryBank::new()).unwrap();
        assert_eq!(room.winner(), Some(acct(1)));

        room.start().unwrap();

        assert_eq!(room.winner(), None);
        assert_eq!(room.history(), &[acct(1)]);
    }

    #[test]
    fn test_view_matches_queries() {
        let mut room = open_room(&RoomConfig::default());
        room.enter(acct(1), Amount::from_wei(10)).unwrap();
        let view = room.view();
        assert_eq!(view.room_id, RoomId(1));
        assert_eq!(view.state, RoomState::Open);
        assert_eq!(view.players, room.players());
        assert_eq!(view.balance, Amount::from_wei(10));
    }
}
