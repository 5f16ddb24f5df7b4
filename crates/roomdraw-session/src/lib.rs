//! Client context for Roomdraw.
//!
//! A caller of the lottery service is a wallet: an account on some network.
//! This crate turns that into an explicit value instead of ambient page
//! state:
//!
//! 1. **Bootstrapping** — asking a wallet who the caller is
//!    ([`WalletProvider`], [`connect`])
//! 2. **Context tracking** — the account and network a caller acts as
//!    ([`ClientContext`])
//! 3. **Change events** — account switches, network switches and
//!    disconnects are applied as [`ContextEvent`]s
//!
//! # How it fits in the stack
//!
//! ```text
//! Service facade (above)  ← checks the context before every operation
//!     ↕
//! Session layer (this crate)  ← who is calling, on which network
//!     ↕
//! Protocol layer (below)  ← provides Account
//! ```

#![allow(async_fn_in_trait)]

mod context;
mod error;
mod provider;
mod session;

pub use context::{ClientContext, ContextEvent, connect};
pub use error::SessionError;
pub use provider::{StaticWallet, WalletProvider};
pub use session::{ContextState, NetworkId, SessionConfig};
