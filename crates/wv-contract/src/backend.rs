use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use crate::ContractError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOverrides {
    pub gas_limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// `false` when the receipt reports a reverted execution.
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Receives the positional arguments of one emitted event.
pub type EventHandler = Box<dyn FnMut(Vec<Value>)>;

/// A deployed contract bound to a signer. Arguments and results cross the
/// boundary as JSON; ABI encoding stays with the contract runtime.
#[async_trait(?Send)]
pub trait ContractBackend {
    async fn call(&self, method: &str, args: &[Value]) -> Result<Value, ContractError>;

    /// Resolves once the transaction is accepted by the wallet/network.
    async fn send(
        &self,
        method: &str,
        args: &[Value],
        overrides: &TxOverrides,
    ) -> Result<TxHash, ContractError>;

    /// Resolves once the transaction is included in a block.
    async fn wait(&self, tx_hash: &TxHash) -> Result<TxReceipt, ContractError>;
}

pub trait EventSource {
    fn on(&self, event: &str, handler: EventHandler) -> Result<ListenerId, ContractError>;
    fn off(&self, listener: ListenerId);
}

#[async_trait(?Send)]
impl<T> ContractBackend for Rc<T>
where
    T: ContractBackend + ?Sized,
{
    async fn call(&self, method: &str, args: &[Value]) -> Result<Value, ContractError> {
        (**self).call(method, args).await
    }

    async fn send(
        &self,
        method: &str,
        args: &[Value],
        overrides: &TxOverrides,
    ) -> Result<TxHash, ContractError> {
        (**self).send(method, args, overrides).await
    }

    async fn wait(&self, tx_hash: &TxHash) -> Result<TxReceipt, ContractError> {
        (**self).wait(tx_hash).await
    }
}

impl<T> EventSource for Rc<T>
where
    T: EventSource + ?Sized,
{
    fn on(&self, event: &str, handler: EventHandler) -> Result<ListenerId, ContractError> {
        (**self).on(event, handler)
    }

    fn off(&self, listener: ListenerId) {
        (**self).off(listener)
    }
}
