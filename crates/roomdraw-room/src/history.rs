//! Append-only record of a room's winners.

use roomdraw_protocol::Account;

/// Winners of every completed round, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinnerHistory {
    winners: Vec<Account>,
}

impl WinnerHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, account: Account) {
        self.winners.push(account);
    }

    pub fn all(&self) -> &[Account] {
        &self.winners
    }

    pub fn last(&self) -> Option<Account> {
        self.winners.last().copied()
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }
}
