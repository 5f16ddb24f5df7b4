//! `LotteryService` builder and request handling.
//!
//! This is the entry point for running Roomdraw. It ties the layers
//! together: session (who is calling) → protocol (what they ask) → room
//! (the ledger state machine).

use roomdraw_protocol::{
    Account, Amount, Codec, Entrant, Notification, Operation, Outcome, ProtocolError, Request,
    Response, RoomId,
};
use roomdraw_room::{
    Draw, ExecutionEnv, FundsTransfer, RoomConfig, RoomError, RoomRegistry, RoomView,
};
use roomdraw_session::{ClientContext, SessionConfig, WalletProvider};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};

use crate::RoomdrawError;

/// Service-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Notifications buffered per subscriber before the slowest one
    /// starts missing events.
    ///
    /// Default: 256.
    pub notification_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            notification_capacity: 256,
        }
    }
}

/// Everything an operation mutates, behind one lock.
struct Ledger<T, E> {
    registry: RoomRegistry,
    transfer: T,
    env: E,
}

/// Builder for configuring a [`LotteryService`].
///
/// # Example
///
/// ```rust
/// use roomdraw::prelude::*;
///
/// let service = LotteryServiceBuilder::new()
///     .room_config(RoomConfig {
///         min_stake: Amount::from_wei(1_000),
///         ..RoomConfig::default()
///     })
///     .build(InMemoryBank::new(), DevChain::default());
/// # let _ = service;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LotteryServiceBuilder {
    config: ServiceConfig,
    room_config: RoomConfig,
    session_config: SessionConfig,
}

impl LotteryServiceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the configuration every room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets the configuration used by [`LotteryService::connect`].
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Builds the service around a payout destination and an execution
    /// environment.
    pub fn build<T, E>(self, transfer: T, env: E) -> LotteryService<T, E>
    where
        T: FundsTransfer,
        E: ExecutionEnv,
    {
        let (notifications, _) = broadcast::channel(self.config.notification_capacity.max(1));
        LotteryService {
            ledger: Mutex::new(Ledger {
                registry: RoomRegistry::new(self.room_config),
                transfer,
                env,
            }),
            notifications,
            session_config: self.session_config,
        }
    }
}

/// The lottery, shared by every caller.
///
/// Operations are admitted one at a time: each takes the ledger lock,
/// receives the next block from the execution environment, and runs to
/// completion against the registry. Notifications are published after
/// the lock is released and only for committed operations. Wrap the
/// service in an `Arc` to share it across tasks.
pub struct LotteryService<T: FundsTransfer, E: ExecutionEnv> {
    ledger: Mutex<Ledger<T, E>>,
    notifications: broadcast::Sender<Notification>,
    session_config: SessionConfig,
}

impl<T: FundsTransfer, E: ExecutionEnv> LotteryService<T, E> {
    /// Builds a client context from a wallet, checked against this
    /// service's expected network.
    pub async fn connect<P: WalletProvider>(
        &self,
        provider: &P,
    ) -> Result<ClientContext, RoomdrawError> {
        Ok(roomdraw_session::connect(provider, &self.session_config).await?)
    }

    /// Receives every notification published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    // -- Operations -------------------------------------------------------

    /// Runs one operation on behalf of `ctx`.
    ///
    /// # Errors
    /// [`RoomdrawError::Session`] if the context cannot act or an entry names
    /// an account other than the context's, otherwise
    /// [`RoomdrawError::Room`] with whatever the room rejected.
    pub async fn dispatch(
        &self,
        ctx: &ClientContext,
        room_id: RoomId,
        operation: Operation,
    ) -> Result<Outcome, RoomdrawError> {
        if let Err(e) = ctx.authorize(&operation) {
            tracing::debug!(
                context = %ctx.id(),
                op = operation.name(),
                %room_id,
                error = %e,
                "operation refused by client context"
            );
            return Err(e.into());
        }

        let receipt = {
            let mut guard = self.ledger.lock().await;
            let Ledger {
                registry,
                transfer,
                env,
            } = &mut *guard;
            let block = env.next_block();
            registry.dispatch(room_id, operation, &block, transfer)?
        };

        self.publish(receipt.notifications);
        Ok(receipt.outcome)
    }

    /// Creates the room if needed. Returns `true` if this call created it.
    pub async fn create_or_join(
        &self,
        ctx: &ClientContext,
        room_id: RoomId,
    ) -> Result<bool, RoomdrawError> {
        match self.dispatch(ctx, room_id, Operation::CreateOrJoin).await? {
            Outcome::Joined { created } => Ok(created),
            other => Err(unexpected(other)),
        }
    }

    /// Opens a round. Returns its 1-based number.
    pub async fn start(&self, ctx: &ClientContext, room_id: RoomId) -> Result<u64, RoomdrawError> {
        match self.dispatch(ctx, room_id, Operation::Start).await? {
            Outcome::Opened { round } => Ok(round),
            other => Err(unexpected(other)),
        }
    }

    /// Enters the context's account with `stake`. Returns the new pooled
    /// balance.
    pub async fn enter(
        &self,
        ctx: &ClientContext,
        room_id: RoomId,
        stake: Amount,
    ) -> Result<Amount, RoomdrawError> {
        let account = ctx.ensure_ready()?;
        match self
            .dispatch(ctx, room_id, Operation::Enter { account, stake })
            .await?
        {
            Outcome::Entered { balance } => Ok(balance),
            other => Err(unexpected(other)),
        }
    }

    /// Like [`enter`](Self::enter), with the stake given in ether
    /// (`"0.1"`). A malformed amount is an invalid stake.
    pub async fn enter_ether(
        &self,
        ctx: &ClientContext,
        room_id: RoomId,
        stake: &str,
    ) -> Result<Amount, RoomdrawError> {
        ctx.ensure_ready()?;
        let stake =
            Amount::parse_ether(stake).map_err(|e| RoomError::InvalidStake(e.to_string()))?;
        self.enter(ctx, room_id, stake).await
    }

    /// Draws the winner and pays out the pool.
    pub async fn end(&self, ctx: &ClientContext, room_id: RoomId) -> Result<Draw, RoomdrawError> {
        match self.dispatch(ctx, room_id, Operation::End).await? {
            Outcome::Drawn {
                round,
                winner,
                payout,
            } => Ok(Draw {
                round,
                winner,
                payout,
            }),
            other => Err(unexpected(other)),
        }
    }

    // -- Queries ----------------------------------------------------------

    pub async fn players(
        &self,
        ctx: &ClientContext,
        room_id: RoomId,
    ) -> Result<Vec<Entrant>, RoomdrawError> {
        match self.dispatch(ctx, room_id, Operation::Players).await? {
            Outcome::Players { entrants } => Ok(entrants),
            other => Err(unexpected(other)),
        }
    }

    pub async fn balance(&self, ctx: &ClientContext, room_id: RoomId) -> Result<Amount, RoomdrawError> {
        match self.dispatch(ctx, room_id, Operation::Balance).await? {
            Outcome::Balance { balance } => Ok(balance),
            other => Err(unexpected(other)),
        }
    }

    pub async fn winner(
        &self,
        ctx: &ClientContext,
        room_id: RoomId,
    ) -> Result<Option<Account>, RoomdrawError> {
        match self.dispatch(ctx, room_id, Operation::Winner).await? {
            Outcome::Winner { winner } => Ok(winner),
            other => Err(unexpected(other)),
        }
    }

    pub async fn history(
        &self,
        ctx: &ClientContext,
        room_id: RoomId,
    ) -> Result<Vec<Account>, RoomdrawError> {
        match self.dispatch(ctx, room_id, Operation::History).await? {
            Outcome::History { winners } => Ok(winners),
            other => Err(unexpected(other)),
        }
    }

    /// Everything about a room in one snapshot.
    pub async fn room_view(
        &self,
        ctx: &ClientContext,
        room_id: RoomId,
    ) -> Result<RoomView, RoomdrawError> {
        ctx.ensure_ready()?;
        let guard = self.ledger.lock().await;
        Ok(guard.registry.get(room_id)?.view())
    }

    /// Gives `f` access to the payout destination, under the ledger lock.
    pub async fn with_funds<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.ledger.lock().await;
        f(&mut guard.transfer)
    }

    // -- Wire -------------------------------------------------------------

    /// Answers a typed request. Every failure becomes an error report
    /// carrying the request's `seq`.
    pub async fn handle_request(&self, ctx: &ClientContext, request: Request) -> Response {
        let result = self
            .dispatch(ctx, request.room_id, request.operation)
            .await
            .map_err(|e| e.report());
        Response {
            seq: request.seq,
            result,
        }
    }

    /// Decodes a [`Request`], answers it and encodes the [`Response`].
    ///
    /// Undecodable input is answered with an `InvalidMessage` report and
    /// `seq` 0.
    ///
    /// # Errors
    /// Only if the response itself cannot be encoded.
    pub async fn handle_encoded<C: Codec>(
        &self,
        ctx: &ClientContext,
        codec: &C,
        data: &[u8],
    ) -> Result<Vec<u8>, RoomdrawError> {
        let response = match codec.decode::<Request>(data) {
            Ok(request) => self.handle_request(ctx, request).await,
            Err(e) => {
                tracing::debug!(context = %ctx.id(), error = %e, "failed to decode request");
                Response {
                    seq: 0,
                    result: Err(RoomdrawError::from(e).report()),
                }
            }
        };
        Ok(codec.encode(&response)?)
    }

    fn publish(&self, notifications: Vec<Notification>) {
        for notification in notifications {
            // No receivers is not an error; nobody is listening yet.
            if self.notifications.send(notification).is_err() {
                tracing::trace!("notification dropped, no subscribers");
            }
        }
    }
}

/// Every operation answers with its own outcome variant; reaching this
/// means the registry and this facade disagree about the contract.
fn unexpected(outcome: Outcome) -> RoomdrawError {
    RoomdrawError::Protocol(ProtocolError::InvalidMessage(format!(
        "unexpected outcome {outcome:?}"
    )))
}
