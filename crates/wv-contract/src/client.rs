use std::marker::PhantomData;
use tracing::{debug, info, warn};
use wv_api_types::parse_uint;

use crate::backend::{ContractBackend, TxHash, TxOverrides, TxReceipt};
use crate::interface::ContractInterface;
use crate::ContractError;

/// Typed calls against one deployed contract.
pub struct ContractClient<C, B> {
    backend: B,
    gas_limit: Option<u64>,
    _contract: PhantomData<fn() -> C>,
}

impl<C, B> ContractClient<C, B>
where
    C: ContractInterface,
    B: ContractBackend,
{
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            gas_limit: C::DEFAULT_GAS_LIMIT,
            _contract: PhantomData,
        }
    }

    /// A configured gas ceiling replaces the contract's default; `None`
    /// keeps the default.
    pub fn with_gas_limit(mut self, gas_limit: Option<u64>) -> Self {
        if gas_limit.is_some() {
            self.gas_limit = gas_limit;
        }
        self
    }

    pub fn gas_limit(&self) -> Option<u64> {
        self.gas_limit
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn read_all(&self) -> Result<Vec<C::Record>, ContractError> {
        let raw = self.backend.call(C::READ_ALL, &[]).await?;
        let items = raw
            .as_array()
            .ok_or_else(|| ContractError::decode(C::READ_ALL, "expected an array"))?;

        let records = items
            .iter()
            .map(C::decode_record)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("{}.{} returned {} records", C::NAME, C::READ_ALL, records.len());
        Ok(records)
    }

    pub async fn get_count(&self) -> Result<u64, ContractError> {
        match C::COUNT {
            Some(method) => {
                let raw = self.backend.call(method, &[]).await?;
                Ok(parse_uint(&raw)?)
            }
            None => Ok(self.read_all().await?.len() as u64),
        }
    }

    /// Hands the write to the wallet. The returned transaction is submitted
    /// but not yet confirmed.
    pub async fn send_action(&self, action: &C::Action) -> Result<PendingTx<'_, B>, ContractError> {
        let call = C::encode_action(action);
        let overrides = TxOverrides {
            gas_limit: self.gas_limit,
        };

        let tx_hash = match self.backend.send(call.method, &call.args, &overrides).await {
            Ok(hash) => hash,
            Err(err) => {
                warn!("{}.{} was not submitted: {}", C::NAME, call.method, err);
                return Err(err);
            }
        };

        info!("{}.{} submitted as {}", C::NAME, call.method, tx_hash);
        Ok(PendingTx {
            backend: &self.backend,
            tx_hash,
        })
    }

    /// Sends and waits for inclusion.
    pub async fn submit_action(&self, action: &C::Action) -> Result<TxReceipt, ContractError> {
        self.send_action(action).await?.confirm().await
    }
}

pub struct PendingTx<'a, B> {
    backend: &'a B,
    tx_hash: TxHash,
}

impl<B> PendingTx<'_, B>
where
    B: ContractBackend,
{
    pub fn tx_hash(&self) -> &TxHash {
        &self.tx_hash
    }

    pub async fn confirm(self) -> Result<TxReceipt, ContractError> {
        let receipt = self.backend.wait(&self.tx_hash).await?;
        if !receipt.success {
            warn!("{} reverted on-chain", self.tx_hash);
            return Err(ContractError::Reverted { reason: None });
        }
        info!("{} confirmed in block {:?}", self.tx_hash, receipt.block_number);
        Ok(receipt)
    }
}
