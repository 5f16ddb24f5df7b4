//! The client context: who is calling and on which network.
//!
//! A context is created once per caller with [`connect`] and then kept up
//! to date by applying [`ContextEvent`]s as the wallet reports them. The
//! service checks every operation with [`ClientContext::authorize`], so a
//! caller on the wrong network, without an account, or naming someone
//! else's account never reaches a room.

use rand::Rng;
use roomdraw_protocol::{Account, Operation};

use crate::{ContextState, NetworkId, SessionConfig, SessionError, WalletProvider};

/// Something the wallet reported after the context was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextEvent {
    /// The granted accounts changed. The first one becomes active; an
    /// empty list disconnects the context.
    AccountsChanged(Vec<Account>),
    /// The wallet switched networks.
    ChainChanged(NetworkId),
    /// The wallet went away.
    Disconnected,
}

#[derive(Debug, Clone)]
pub struct ClientContext {
    /// Random identifier for correlating log lines of one caller.
    id: String,
    account: Option<Account>,
    network: NetworkId,
    expected_network: NetworkId,
    state: ContextState,
}

impl ClientContext {
    /// Creates a context for `account` on `network`.
    pub fn new(account: Account, network: NetworkId, config: &SessionConfig) -> Self {
        let mut ctx = Self {
            id: generate_context_id(),
            account: Some(account),
            network,
            expected_network: config.expected_network,
            state: ContextState::Disconnected,
        };
        ctx.state = ctx.derive_state();
        ctx
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The active account, if any.
    pub fn account(&self) -> Option<Account> {
        self.account
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Applies a wallet event and returns the resulting state.
    ///
    /// Nothing is reloaded or reset besides the context itself; rooms and
    /// balances are unaffected by a caller switching accounts.
    pub fn apply(&mut self, event: ContextEvent) -> ContextState {
        match event {
            ContextEvent::AccountsChanged(accounts) => {
                self.account = accounts.first().copied();
            }
            ContextEvent::ChainChanged(network) => {
                self.network = network;
            }
            ContextEvent::Disconnected => {
                self.account = None;
            }
        }

        let previous = self.state;
        self.state = self.derive_state();
        if previous != self.state {
            tracing::info!(
                context = %self.id,
                from = %previous,
                to = %self.state,
                network = %self.network,
                "client context changed"
            );
        }
        self.state
    }

    /// Returns the account to act as, or why the context cannot act.
    ///
    /// # Errors
    /// - [`SessionError::Disconnected`]: no active account
    /// - [`SessionError::WrongNetwork`]: attached to another network
    pub fn ensure_ready(&self) -> Result<Account, SessionError> {
        match (self.state, self.account) {
            (ContextState::Connected, Some(account)) => Ok(account),
            (ContextState::WrongNetwork, Some(_)) => Err(SessionError::WrongNetwork {
                expected: self.expected_network,
                actual: self.network,
            }),
            _ => Err(SessionError::Disconnected),
        }
    }

    /// Checks that this context may run `operation` and returns the account
    /// it acts as. An [`Operation::Enter`] must name that same account.
    ///
    /// # Errors
    /// Everything [`ensure_ready`](Self::ensure_ready) returns, plus
    /// [`SessionError::AccountMismatch`] for an entry on behalf of another
    /// account.
    pub fn authorize(&self, operation: &Operation) -> Result<Account, SessionError> {
        let signer = self.ensure_ready()?;
        match operation {
            Operation::Enter { account, .. } if *account != signer => {
                Err(SessionError::AccountMismatch {
                    signer,
                    requested: *account,
                })
            }
            _ => Ok(signer),
        }
    }

    fn derive_state(&self) -> ContextState {
        match self.account {
            None => ContextState::Disconnected,
            Some(_) if self.network == self.expected_network => ContextState::Connected,
            Some(_) => ContextState::WrongNetwork,
        }
    }
}

/// Asks `provider` for the caller's accounts and network and builds a
/// context for the first account.
///
/// A wallet on the wrong network still yields a context, in the
/// [`ContextState::WrongNetwork`] state, so a later
/// [`ContextEvent::ChainChanged`] can make it usable.
///
/// # Errors
/// [`SessionError::NoAccounts`] if the wallet grants no account, or any
/// error the provider returns.
pub async fn connect<P: WalletProvider>(
    provider: &P,
    config: &SessionConfig,
) -> Result<ClientContext, SessionError> {
    let accounts = provider.request_accounts().await?;
    let account = accounts.first().copied().ok_or(SessionError::NoAccounts)?;
    let network = provider.network().await?;

    let ctx = ClientContext::new(account, network, config);
    match ctx.state() {
        ContextState::Connected => {
            tracing::info!(context = %ctx.id, %account, %network, "client connected");
        }
        _ => {
            tracing::warn!(
                context = %ctx.id,
                %account,
                %network,
                expected = %config.expected_network,
                "client connected on unexpected network"
            );
        }
    }
    Ok(ctx)
}

/// Generates a random 16-character hex string.
fn generate_context_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 8] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================
