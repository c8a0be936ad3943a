use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use thiserror::Error;
use tracing::{info, warn};
use wv_api_types::WalletAddress;

/// EIP-1193 "user rejected request".
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletMethod {
    /// Accounts already authorized for this origin; never prompts.
    Accounts,
    /// Prompts the wallet UI for permission.
    RequestAccounts,
}

impl WalletMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletMethod::Accounts => "eth_accounts",
            WalletMethod::RequestAccounts => "eth_requestAccounts",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("user rejected the request")]
    UserRejected,
    #[error("wallet error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("wallet transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        if code == USER_REJECTED_CODE {
            ProviderError::UserRejected
        } else {
            ProviderError::Rpc {
                code,
                message: message.into(),
            }
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Get MetaMask!")]
    WalletUnavailable,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("wallet returned no accounts")]
    NoAccounts,
}

impl ConnectError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, ConnectError::Provider(ProviderError::UserRejected))
    }
}

/// The browser-injected wallet, reduced to the account requests we make.
#[async_trait(?Send)]
pub trait WalletProvider {
    async fn request_accounts(&self, method: WalletMethod) -> Result<Vec<String>, ProviderError>;
}

pub struct WalletConnector<P> {
    provider: Option<P>,
}

impl<P> WalletConnector<P>
where
    P: WalletProvider,
{
    /// `None` models a page without an injected wallet.
    pub fn new(provider: Option<P>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    pub fn is_wallet_available(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn get_authorized_account(&self) -> Option<WalletAddress> {
        let Some(provider) = self.provider.as_ref() else {
            info!("no wallet provider injected");
            return None;
        };

        match provider.request_accounts(WalletMethod::Accounts).await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => {
                    info!("found an authorized account: {}", account);
                    Some(WalletAddress(account))
                }
                None => {
                    info!("no authorized account found");
                    None
                }
            },
            Err(err) => {
                warn!("eth_accounts failed: {}", err);
                None
            }
        }
    }

    pub async fn request_connection(&self) -> Result<WalletAddress, ConnectError> {
        let provider = self.provider.as_ref().ok_or(ConnectError::WalletUnavailable)?;

        let accounts = provider
            .request_accounts(WalletMethod::RequestAccounts)
            .await?;

        let account = accounts.into_iter().next().ok_or(ConnectError::NoAccounts)?;
        info!("connected {}", account);
        Ok(WalletAddress(account))
    }
}

/// In-memory wallet. Starts with no authorized accounts; a successful
/// `eth_requestAccounts` authorizes every account it holds.
#[derive(Default)]
pub struct StaticWalletProvider {
    accounts: Vec<String>,
    authorized: Cell<bool>,
    reject_connection: Cell<bool>,
    read_failure: RefCell<Option<ProviderError>>,
    requests: RefCell<Vec<WalletMethod>>,
}

impl StaticWalletProvider {
    pub fn new(accounts: Vec<String>) -> Self {
        Self {
            accounts,
            ..Self::default()
        }
    }

    pub fn authorized(accounts: Vec<String>) -> Self {
        let provider = Self::new(accounts);
        provider.authorized.set(true);
        provider
    }

    pub fn reject_connections(&self, reject: bool) {
        self.reject_connection.set(reject);
    }

    pub fn fail_reads_with(&self, err: Option<ProviderError>) {
        *self.read_failure.borrow_mut() = err;
    }

    pub fn requests(&self) -> Vec<WalletMethod> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl WalletProvider for StaticWalletProvider {
    async fn request_accounts(&self, method: WalletMethod) -> Result<Vec<String>, ProviderError> {
        self.requests.borrow_mut().push(method);
        match method {
            WalletMethod::Accounts => {
                if let Some(err) = self.read_failure.borrow().clone() {
                    return Err(err);
                }
                if self.authorized.get() {
                    Ok(self.accounts.clone())
                } else {
                    Ok(Vec::new())
                }
            }
            WalletMethod::RequestAccounts => {
                if self.reject_connection.get() {
                    return Err(ProviderError::from_rpc(
                        USER_REJECTED_CODE,
                        "User rejected the request.",
                    ));
                }
                self.authorized.set(true);
                Ok(self.accounts.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";

    #[tokio::test]
    async fn authorized_account_is_the_first_one() {
        let connector = WalletConnector::new(Some(StaticWalletProvider::authorized(vec![
            ALICE.to_owned(),
            BOB.to_owned(),
        ])));

        assert!(connector.is_wallet_available());
        assert_eq!(
            connector.get_authorized_account().await,
            Some(WalletAddress(ALICE.to_owned()))
        );
    }

    #[tokio::test]
    async fn authorized_lookup_never_prompts() {
        let provider = StaticWalletProvider::new(vec![ALICE.to_owned()]);
        let connector = WalletConnector::new(Some(provider));

        assert_eq!(connector.get_authorized_account().await, None);
        let provider = connector.provider().expect("provider");
        assert_eq!(provider.requests(), vec![WalletMethod::Accounts]);
    }

    #[tokio::test]
    async fn provider_failure_during_lookup_is_swallowed() {
        let provider = StaticWalletProvider::authorized(vec![ALICE.to_owned()]);
        provider.fail_reads_with(Some(ProviderError::Transport("disconnected".into())));
        let connector = WalletConnector::new(Some(provider));

        assert_eq!(connector.get_authorized_account().await, None);
    }

    #[tokio::test]
    async fn missing_wallet_cannot_connect() {
        let connector: WalletConnector<StaticWalletProvider> = WalletConnector::new(None);

        assert!(!connector.is_wallet_available());
        assert_eq!(connector.get_authorized_account().await, None);
        assert_eq!(
            connector.request_connection().await,
            Err(ConnectError::WalletUnavailable)
        );
    }

    #[tokio::test]
    async fn connection_authorizes_subsequent_lookups() {
        let connector = WalletConnector::new(Some(StaticWalletProvider::new(vec![BOB.to_owned()])));

        let account = connector.request_connection().await.expect("connect");
        assert_eq!(account, WalletAddress(BOB.to_owned()));
        assert_eq!(connector.get_authorized_account().await, Some(account));
    }

    #[tokio::test]
    async fn rejection_maps_to_user_rejected() {
        let provider = StaticWalletProvider::new(vec![ALICE.to_owned()]);
        provider.reject_connections(true);
        let connector = WalletConnector::new(Some(provider));

        let err = connector.request_connection().await.expect_err("rejected");
        assert!(err.is_user_rejection());
    }

    #[tokio::test]
    async fn empty_account_list_is_an_error() {
        let connector = WalletConnector::new(Some(StaticWalletProvider::new(Vec::new())));

        assert_eq!(
            connector.request_connection().await,
            Err(ConnectError::NoAccounts)
        );
    }

    #[test]
    fn rpc_codes_other_than_4001_are_kept() {
        assert_eq!(
            ProviderError::from_rpc(-32002, "already pending"),
            ProviderError::Rpc {
                code: -32002,
                message: "already pending".to_owned()
            }
        );
    }
}
