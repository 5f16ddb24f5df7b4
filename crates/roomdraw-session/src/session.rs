//! Session types: the network a caller is on and what state their context
//! is in.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NetworkId
// ---------------------------------------------------------------------------

/// Chain identifier reported by a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(pub u64);

impl NetworkId {
    /// The local development chain.
    pub const DEVNET: NetworkId = NetworkId(31337);
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for client contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// The only network operations are accepted on.
    ///
    /// Default: [`NetworkId::DEVNET`].
    pub expected_network: NetworkId,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expected_network: NetworkId::DEVNET,
        }
    }
}

// ---------------------------------------------------------------------------
// ContextState
// ---------------------------------------------------------------------------

/// Where a client context stands.
///
/// ```text
///   Connected ←──(ChainChanged to expected)──→ WrongNetwork
///       │                                          │
///       └─────────(Disconnected / no accounts)─────┴──→ Disconnected
/// ```
///
/// A disconnected context becomes usable again once an `AccountsChanged`
/// event supplies an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextState {
    /// Has an account on the expected network; operations are allowed.
    Connected,
    /// Has an account, but on another network.
    WrongNetwork,
    /// No usable account.
    Disconnected,
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "Connected"),
            Self::WrongNetwork => write!(f, "WrongNetwork"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}
