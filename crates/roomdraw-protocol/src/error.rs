//! Error types for the protocol layer.
//!
//! Each crate in Roomdraw defines its own error enum. When you see a
//! `ProtocolError`, the problem is in parsing a value or in
//! serialization, never in room bookkeeping.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields,
    /// or an unknown operation tag.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message is well-formed but violates the contract.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// An amount string could not be parsed (bad digits, more than 18
    /// fractional places, negative sign, overflow).
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    /// An account string is not a 20-byte hex address.
    #[error("invalid account {0:?}")]
    InvalidAccount(String),
}
