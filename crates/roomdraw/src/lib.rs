//! # Roomdraw
//!
//! A room-partitioned pooled lottery ledger.
//!
//! Any caller may open an isolated room; accounts stake into its open
//! round, one entrant is drawn and receives the whole pool, and the room
//! keeps an auditable history of its winners. The ledger itself lives in
//! [`roomdraw_room`]; this crate wraps it in an async [`LotteryService`]
//! that checks each caller's [`ClientContext`](roomdraw_session::ClientContext),
//! serializes operations, and publishes notifications for committed ones.
//!
//! ## Quick Start
//!
//! ```rust
//! use roomdraw::prelude::*;
//!
//! # async fn run() -> Result<(), RoomdrawError> {
//! let service = LotteryServiceBuilder::new().build(InMemoryBank::new(), DevChain::default());
//!
//! let alice = Account::new([0xa1; 20]);
//! let ctx = service.connect(&StaticWallet::devnet(alice)).await?;
//!
//! let room = RoomId(1);
//! service.create_or_join(&ctx, room).await?;
//! service.start(&ctx, room).await?;
//! service.enter_ether(&ctx, room, "0.1").await?;
//! let draw = service.end(&ctx, room).await?;
//! assert_eq!(draw.winner, alice);
//! # Ok(())
//! # }
//! ```

mod error;
mod service;

pub use error::RoomdrawError;
pub use service::{LotteryService, LotteryServiceBuilder, ServiceConfig};

pub mod prelude {
    pub use crate::{LotteryService, LotteryServiceBuilder, RoomdrawError, ServiceConfig};
    pub use roomdraw_protocol::{
        Account, Amount, Codec, Entrant, ErrorCode, ErrorReport, Notification, Operation,
        Outcome, Request, Response, RoomId,
    };
    #[cfg(feature = "json")]
    pub use roomdraw_protocol::JsonCodec;
    pub use roomdraw_room::{
        BlockContext, DevChain, DevChainConfig, Draw, ExecutionEnv, FixedEnv, FundsTransfer,
        InMemoryBank, RoomConfig, RoomError, RoomState, RoomView, TransferError, WinnerRetention,
    };
    pub use roomdraw_session::{
        ClientContext, ContextEvent, ContextState, NetworkId, SessionConfig, SessionError,
        StaticWallet, WalletProvider,
    };
}
