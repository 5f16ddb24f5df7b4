//! Wallet hook for discovering who the caller is.
//!
//! Roomdraw does not manage keys. A wallet (browser extension, hardware
//! signer, test fixture) knows which accounts the caller controls and which
//! network it is attached to; [`WalletProvider`] is how the session layer
//! asks it.

use roomdraw_protocol::Account;

use crate::{NetworkId, SessionError};

/// Source of the caller's accounts and network.
///
/// # Example
///
/// ```rust
/// use roomdraw_protocol::Account;
/// use roomdraw_session::{NetworkId, SessionError, WalletProvider};
///
/// /// A wallet with one fixed account on the dev chain.
/// struct FixtureWallet(Account);
///
/// impl WalletProvider for FixtureWallet {
///     async fn request_accounts(&self) -> Result<Vec<Account>, SessionError> {
///         Ok(vec![self.0])
///     }
///
///     async fn network(&self) -> Result<NetworkId, SessionError> {
///         Ok(NetworkId::DEVNET)
///     }
/// }
/// ```
pub trait WalletProvider: Send + Sync + 'static {
    /// Accounts the caller has granted access to, preferred account first.
    fn request_accounts(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Account>, SessionError>> + Send;

    /// The network the wallet is currently attached to.
    fn network(&self) -> impl std::future::Future<Output = Result<NetworkId, SessionError>> + Send;
}

/// A wallet with a fixed account list and network. For development and
/// tests.
#[derive(Debug, Clone)]
pub struct StaticWallet {
    pub accounts: Vec<Account>,
    pub network: NetworkId,
}

impl StaticWallet {
    /// A single account on the dev chain.
    pub fn devnet(account: Account) -> Self {
        Self {
            accounts: vec![account],
            network: NetworkId::DEVNET,
        }
    }
}

impl WalletProvider for StaticWallet {
    async fn request_accounts(&self) -> Result<Vec<Account>, SessionError> {
        Ok(self.accounts.clone())
    }

    async fn network(&self) -> Result<NetworkId, SessionError> {
        Ok(self.network)
    }
}
