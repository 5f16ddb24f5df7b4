//! Winner selection.
//!
//! The draw is a pure function of the entrant sequence and the block the
//! `end` operation executes in:
//!
//! ```text
//! seed   = BLAKE3(prevrandao || number_le || timestamp_le || account_0 || … || account_n)
//! winner = entrants[u128_le(seed[0..16]) % n]
//! ```
//!
//! Every entrant holds exactly one ticket no matter how much they staked.
//!
//! # Known weakness
//!
//! `prevrandao`, the block number and the timestamp are all visible to the
//! block producer before the block is published. A producer who is also an
//! entrant can withhold blocks whose draw does not favour them, and anyone
//! can predict the winner of an `end` landing in a known block. The draw is
//! reproducible and auditable, not unpredictable. The modulo reduction
//! also carries a bias of at most `n / 2^128`, which is negligible.

use roomdraw_protocol::{Account, Entrant};

use crate::{BlockContext, RoomError};

/// Computes the 32-byte draw seed. Exposed so auditors can recompute a
/// past draw from the public inputs.
pub fn draw_seed(entrants: &[Entrant], block: &BlockContext) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&block.prevrandao);
    hasher.update(&block.number.to_le_bytes());
    hasher.update(&block.timestamp.to_le_bytes());
    for entrant in entrants {
        hasher.update(entrant.account.as_bytes());
    }
    *hasher.finalize().as_bytes()
}

/// Picks the winner of a round.
///
/// # Errors
/// [`RoomError::NoEntrants`] if `entrants` is empty.
pub fn select(entrants: &[Entrant], block: &BlockContext) -> Result<Account, RoomError> {
    if entrants.is_empty() {
        return Err(RoomError::NoEntrants);
    }
    let seed = draw_seed(entrants, block);
    let mut head = [0u8; 16];
    head.copy_from_slice(&seed[..16]);
    let index = u128::from_le_bytes(head) % entrants.len() as u128;
    Ok(entrants[index as usize].account)
}
