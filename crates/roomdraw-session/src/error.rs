//! Error types for the session layer.

use roomdraw_protocol::Account;

use crate::NetworkId;

/// Errors raised while establishing or using a client context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The wallet exposed no accounts, or the caller refused access.
    #[error("wallet returned no accounts")]
    NoAccounts,

    /// The context is attached to a network other than the one the
    /// service expects. Operations are refused until the wallet switches.
    #[error("wrong network: expected {expected}, connected to {actual}")]
    WrongNetwork { expected: NetworkId, actual: NetworkId },

    /// The wallet disconnected or every account was removed.
    #[error("client context is disconnected")]
    Disconnected,

    /// An operation names an account other than the one the context is
    /// signed in as.
    #[error("context is signed in as {signer}, cannot act as {requested}")]
    AccountMismatch { signer: Account, requested: Account },

    /// The wallet provider itself failed.
    #[error("wallet provider error: {0}")]
    Provider(String),
}
