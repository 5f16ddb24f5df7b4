//! The room ledger state machine for Roomdraw.
//!
//! Each room is an isolated lottery: accounts stake into an open round,
//! one entrant is drawn and paid the whole pool, and the room keeps an
//! ordered history of its winners. Everything here is synchronous; an
//! operation either commits completely or leaves its room untouched.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: owns rooms, routes [`Operation`](roomdraw_protocol::Operation)s
//! - [`Room`]: lifecycle state machine for one room
//! - [`PlayerLedger`], [`Treasury`], [`WinnerHistory`]: a room's parts
//! - [`select`]: deterministic winner selection
//! - [`FundsTransfer`]: where payouts go
//! - [`ExecutionEnv`] / [`BlockContext`]: the block an operation runs in
//! - [`RoomState`] / [`RoomConfig`]: state machine and settings

mod config;
mod env;
mod error;
mod history;
mod ledger;
mod registry;
mod room;
mod selector;
mod transfer;
mod treasury;

pub use config::{RoomConfig, RoomState, WinnerRetention};
pub use env::{BlockContext, DevChain, DevChainConfig, ExecutionEnv, FixedEnv};
pub use error::RoomError;
pub use history::WinnerHistory;
pub use ledger::PlayerLedger;
pub use registry::{Receipt, RoomRegistry};
pub use room::{Draw, Room, RoomView};
pub use selector::{draw_seed, select};
pub use transfer::{FundsTransfer, InMemoryBank, TransferError};
pub use treasury::Treasury;
