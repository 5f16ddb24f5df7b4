//! Operation contract for Roomdraw.
//!
//! This crate defines the "language" that external callers (wallet layer,
//! UI, tooling) and the lottery core speak:
//!
//! - **Types** ([`RoomId`], [`Account`], [`Amount`]) — identities and
//!   values that every other layer passes around.
//! - **Messages** ([`Operation`], [`Outcome`], [`Notification`],
//!   [`Request`], [`Response`]) — the typed operation contract.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while parsing
//!   values or encoding/decoding messages.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about rooms, ledgers or sessions. It
//! only describes what can be asked and what can be answered.
//!
//! ```text
//! Caller (ClientContext) → Protocol (Operation) → Room core (Receipt)
//! ```

mod codec;
mod error;
mod message;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{
    Entrant, ErrorCode, ErrorReport, Notification, Operation, Outcome,
    Request, Response,
};
pub use types::{Account, Amount, RoomId};
