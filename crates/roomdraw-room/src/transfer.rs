//! The seam through which a room hands funds back to the execution
//! environment.
//!
//! Rooms never hold "real" money; they keep a pooled balance and, on a
//! draw, ask a [`FundsTransfer`] to move that balance to the winner. The
//! environment may refuse (a recipient contract that reverts on receive),
//! and the room treats that refusal as a failed draw.

use std::collections::{HashMap, HashSet};

use roomdraw_protocol::{Account, Amount};

/// Why a transfer was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    /// The recipient does not accept incoming funds.
    #[error("recipient {0} rejected the transfer")]
    Rejected(Account),

    /// Crediting the recipient would overflow its balance.
    #[error("balance of {0} would overflow")]
    Overflow(Account),
}

/// Moves funds out of a room to an external account.
///
/// Implementations must be all-or-nothing: on `Err` the recipient's
/// balance is unchanged.
pub trait FundsTransfer {
    fn transfer(&mut self, to: &Account, amount: Amount) -> Result<(), TransferError>;
}

impl<T: FundsTransfer + ?Sized> FundsTransfer for &mut T {
    fn transfer(&mut self, to: &Account, amount: Amount) -> Result<(), TransferError> {
        (**self).transfer(to, amount)
    }
}

/// In-process account balances, used by the dev chain and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBank {
    balances: HashMap<Account, Amount>,
    /// Accounts that refuse incoming funds.
    rejecting: HashSet<Account>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance of `account` (zero if never credited).
    pub fn balance_of(&self, account: &Account) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Makes every future transfer to `account` fail.
    pub fn reject_deposits(&mut self, account: Account) {
        self.rejecting.insert(account);
    }

    /// Undoes [`reject_deposits`](Self::reject_deposits).
    pub fn accept_deposits(&mut self, account: &Account) {
        self.rejecting.remove(account);
    }
}

impl FundsTransfer for InMemoryBank {
    fn transfer(&mut self, to: &Account, amount: Amount) -> Result<(), TransferError> {
        if self.rejecting.contains(to) {
            tracing::warn!(recipient = %to, %amount, "transfer rejected by recipient");
            return Err(TransferError::Rejected(*to));
        }
        let current = self.balance_of(to);
        let updated = current
            .checked_add(amount)
            .ok_or(TransferError::Overflow(*to))?;
        self.balances.insert(*to, updated);
        Ok(())
    }
}
