//! Player ledger: who entered the current round, in what order.

use std::collections::HashSet;

use roomdraw_protocol::{Account, Amount, Entrant};

use crate::RoomError;

/// The entrants of one round.
///
/// `entrants` keeps insertion order (the draw hashes it in that order);
/// `index` answers "already entered?" without scanning. The two are kept
/// in sync by `enter` and `clear`, the only mutators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerLedger {
    entrants: Vec<Entrant>,
    index: HashSet<Account>,
}

impl PlayerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `account` as an entrant with `stake`.
    ///
    /// # Errors
    /// [`RoomError::DuplicateEntry`] if the account already entered this
    /// round. The ledger is unchanged in that case.
    pub fn enter(&mut self, account: Account, stake: Amount) -> Result<(), RoomError> {
        if !self.index.insert(account) {
            return Err(RoomError::DuplicateEntry(account));
        }
        self.entrants.push(Entrant { account, stake });
        Ok(())
    }

    /// Empties the round. Called once per draw.
    pub fn clear(&mut self) {
        self.entrants.clear();
        self.index.clear();
    }

    /// Current entrants in entry order.
    pub fn members(&self) -> &[Entrant] {
        &self.entrants
    }

    pub fn contains(&self, account: &Account) -> bool {
        self.index.contains(account)
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    /// Sum of every stake in the round.
    pub fn total_staked(&self) -> Amount {
        self.entrants.iter().map(|e| e.stake).sum()
    }
}
