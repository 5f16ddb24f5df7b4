//! Execution-environment inputs: the block each operation runs in.
//!
//! The lottery core never reads a clock or a random number generator on
//! its own. Every operation is applied "inside" a [`BlockContext`] that the
//! environment hands over, and the winner selector derives its draw from
//! that context only. Every observer that replays the same operations in
//! the same blocks therefore reaches the same winners.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// The environment values agreed upon by every observer of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Height of the block the operation executes in.
    pub number: u64,
    /// Block time, seconds since the Unix epoch.
    pub timestamp: u64,
    /// Block-level randomness published by the block producer.
    ///
    /// This value is public as soon as the block exists and a producer
    /// can choose to withhold a block it dislikes. Draws derived from it
    /// are reproducible, not unpredictable.
    pub prevrandao: [u8; 32],
}

/// Supplies one [`BlockContext`] per admitted operation.
pub trait ExecutionEnv {
    fn next_block(&mut self) -> BlockContext;
}

impl<T: ExecutionEnv + ?Sized> ExecutionEnv for &mut T {
    fn next_block(&mut self) -> BlockContext {
        (**self).next_block()
    }
}

// ---------------------------------------------------------------------------
// FixedEnv
// ---------------------------------------------------------------------------

/// Returns the same block forever. Handy for reproducing a specific draw.
#[derive(Debug, Clone, Copy)]
pub struct FixedEnv(pub BlockContext);

impl ExecutionEnv for FixedEnv {
    fn next_block(&mut self) -> BlockContext {
        self.0
    }
}

// ---------------------------------------------------------------------------
// DevChain
// ---------------------------------------------------------------------------

/// Settings for [`DevChain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevChainConfig {
    /// Seconds between consecutive blocks.
    pub block_time_secs: u64,
    /// Timestamp of block 0.
    pub genesis_timestamp: u64,
    /// Seed for `prevrandao`. `None` draws a seed from the OS.
    pub seed: Option<u64>,
}

impl Default for DevChainConfig {
    fn default() -> Self {
        Self {
            block_time_secs: 12,
            genesis_timestamp: 1_700_000_000,
            seed: None,
        }
    }
}

/// A local development chain that mines one block per operation.
///
/// Block numbers start at 1, timestamps advance by `block_time_secs`, and
/// `prevrandao` is drawn from a `StdRng`. With a fixed `seed` two chains
/// produce identical block sequences.
#[derive(Debug)]
pub struct DevChain {
    config: DevChainConfig,
    height: u64,
    rng: StdRng,
}

impl DevChain {
    pub fn new(config: DevChainConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            height: 0,
            rng,
        }
    }

    /// Height of the most recently mined block (0 before the first).
    pub fn height(&self) -> u64 {
        self.height
    }
}

impl Default for DevChain {
    fn default() -> Self {
        Self::new(DevChainConfig::default())
    }
}

impl ExecutionEnv for DevChain {
    fn next_block(&mut self) -> BlockContext {
        self.height += 1;
        let mut prevrandao = [0u8; 32];
        self.rng.fill(&mut prevrandao);
        let block = BlockContext {
            number: self.height,
            timestamp: self
                .config
                .genesis_timestamp
                .saturating_add(self.height.saturating_mul(self.config.block_time_secs)),
            prevrandao,
        };
        tracing::trace!(number = block.number, timestamp = block.timestamp, "block mined");
        block
    }
}
