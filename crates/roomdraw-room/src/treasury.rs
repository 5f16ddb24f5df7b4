//! Treasury: the pooled balance of one room.

use roomdraw_protocol::{Account, Amount};

use crate::{FundsTransfer, RoomError};

/// Per-room fund accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Treasury {
    pooled: Amount,
    min_stake: Amount,
}

impl Treasury {
    /// Creates an empty treasury that rejects stakes below `min_stake`.
    pub fn new(min_stake: Amount) -> Self {
        Self {
            pooled: Amount::ZERO,
            min_stake,
        }
    }

    /// The amount currently held.
    pub fn balance(&self) -> Amount {
        self.pooled
    }

    /// Returns the balance crediting `amount` would produce, without
    /// crediting it.
    ///
    /// # Errors
    /// [`RoomError::InvalidStake`] for a zero stake, a stake below the
    /// configured minimum, or one that would overflow the pool.
    pub fn check_credit(&self, amount: Amount) -> Result<Amount, RoomError> {
        if amount.is_zero() {
            return Err(RoomError::InvalidStake("stake must be positive".into()));
        }
        if amount < self.min_stake {
            return Err(RoomError::InvalidStake(format!(
                "stake {amount} is below the minimum of {}",
                self.min_stake
            )));
        }
        self.pooled
            .checked_add(amount)
            .ok_or_else(|| RoomError::InvalidStake("pool balance would overflow".into()))
    }

    /// Adds a stake to the pool and returns the new balance. On error the
    /// pool is unchanged.
    ///
    /// # Errors
    /// Same as [`check_credit`](Self::check_credit).
    pub fn credit(&mut self, amount: Amount) -> Result<Amount, RoomError> {
        self.pooled = self.check_credit(amount)?;
        Ok(self.pooled)
    }

    /// Sends the whole pool to `to` and resets it to zero.
    ///
    /// The transfer happens first; the balance is only zeroed once it
    /// succeeded, so on error the treasury still holds the full pool.
    pub fn payout(
        &mut self,
        to: &Account,
        transfer: &mut impl FundsTransfer,
    ) -> Result<Amount, RoomError> {
        let amount = self.pooled;
        transfer
            .transfer(to, amount)
            .map_err(|e| RoomError::TransferFailed(*to, e))?;
        self.pooled = Amount::ZERO;
        Ok(amount)
    }
}
