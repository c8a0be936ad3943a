//! Scripted in-memory contract.
//!
//! Reads return whatever was registered with `set_read`; writes succeed
//! unless an outcome was queued with `push_send_outcome`. Events are
//! delivered synchronously by `emit`, in call order.

use async_trait::async_trait;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::backend::{
    ContractBackend, EventHandler, EventSource, ListenerId, TxHash, TxOverrides, TxReceipt,
};
use crate::ContractError;

#[derive(Debug, Clone)]
pub enum SendOutcome {
    Confirm,
    /// Accepted by the wallet, then mined with a failed status.
    RevertOnChain,
    /// Refused before a hash exists.
    Reject(ContractError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentTx {
    pub method: String,
    pub args: Vec<Value>,
    pub overrides: TxOverrides,
    pub tx_hash: TxHash,
}

struct Listener {
    id: ListenerId,
    event: String,
    handler: Rc<RefCell<EventHandler>>,
}

#[derive(Default)]
pub struct InMemoryBackend {
    reads: RefCell<HashMap<String, Result<Value, ContractError>>>,
    outcomes: RefCell<VecDeque<SendOutcome>>,
    receipts: RefCell<HashMap<TxHash, bool>>,
    sent: RefCell<Vec<SentTx>>,
    confirmed: RefCell<Vec<TxHash>>,
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
    read_calls: Cell<usize>,
}

impl InMemoryBackend {
    pub fn set_read(&self, method: &str, value: Value) {
        self.reads.borrow_mut().insert(method.to_owned(), Ok(value));
    }

    pub fn fail_read(&self, method: &str, err: ContractError) {
        self.reads.borrow_mut().insert(method.to_owned(), Err(err));
    }

    pub fn push_send_outcome(&self, outcome: SendOutcome) {
        self.outcomes.borrow_mut().push_back(outcome);
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.sent.borrow().clone()
    }

    pub fn confirmed(&self) -> Vec<TxHash> {
        self.confirmed.borrow().clone()
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.get()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.event == event)
            .count()
    }

    /// Delivers `args` to every listener of `event`. Handlers may attach or
    /// detach listeners while running.
    pub fn emit(&self, event: &str, args: Vec<Value>) {
        let handlers: Vec<Rc<RefCell<EventHandler>>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.event == event)
            .map(|l| Rc::clone(&l.handler))
            .collect();

        for handler in handlers {
            (*handler.borrow_mut())(args.clone());
        }
    }

    fn next(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

#[async_trait(?Send)]
impl ContractBackend for InMemoryBackend {
    async fn call(&self, method: &str, _args: &[Value]) -> Result<Value, ContractError> {
        self.read_calls.set(self.read_calls.get() + 1);
        match self.reads.borrow().get(method) {
            Some(result) => result.clone(),
            None => Err(ContractError::Unsupported(format!("method {method}"))),
        }
    }

    async fn send(
        &self,
        method: &str,
        args: &[Value],
        overrides: &TxOverrides,
    ) -> Result<TxHash, ContractError> {
        let outcome = self
            .outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or(SendOutcome::Confirm);

        let success = match outcome {
            SendOutcome::Reject(err) => return Err(err),
            SendOutcome::Confirm => true,
            SendOutcome::RevertOnChain => false,
        };

        let tx_hash = TxHash(format!("0x{:064x}", self.next()));
        self.receipts.borrow_mut().insert(tx_hash.clone(), success);
        self.sent.borrow_mut().push(SentTx {
            method: method.to_owned(),
            args: args.to_vec(),
            overrides: overrides.clone(),
            tx_hash: tx_hash.clone(),
        });
        Ok(tx_hash)
    }

    async fn wait(&self, tx_hash: &TxHash) -> Result<TxReceipt, ContractError> {
        let success = self
            .receipts
            .borrow()
            .get(tx_hash)
            .copied()
            .ok_or_else(|| ContractError::Provider(format!("unknown transaction {tx_hash}")))?;

        self.confirmed.borrow_mut().push(tx_hash.clone());
        let block_number = self.confirmed.borrow().len() as u64;
        Ok(TxReceipt {
            tx_hash: tx_hash.clone(),
            block_number: Some(block_number),
            success,
        })
    }
}

impl EventSource for InMemoryBackend {
    fn on(&self, event: &str, handler: EventHandler) -> Result<ListenerId, ContractError> {
        let id = ListenerId(self.next());
        self.listeners.borrow_mut().push(Listener {
            id,
            event: event.to_owned(),
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(id)
    }

    fn off(&self, listener: ListenerId) {
        self.listeners.borrow_mut().retain(|l| l.id != listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emit_reaches_only_matching_listeners_in_order() {
        let backend = InMemoryBackend::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&seen);
        backend
            .on("NewWave", Box::new(move |args: Vec<Value>| a.borrow_mut().push(("wave", args))))
            .expect("on");
        let b = Rc::clone(&seen);
        backend
            .on("NewVote", Box::new(move |args: Vec<Value>| b.borrow_mut().push(("vote", args))))
            .expect("on");

        backend.emit("NewWave", vec![json!(1)]);
        backend.emit("NewWave", vec![json!(2)]);

        assert_eq!(
            *seen.borrow(),
            vec![("wave", vec![json!(1)]), ("wave", vec![json!(2)])]
        );
    }

    #[test]
    fn off_detaches_a_listener() {
        let backend = InMemoryBackend::default();
        let id = backend.on("NewWave", Box::new(|_: Vec<Value>| {})).expect("on");
        assert_eq!(backend.listener_count("NewWave"), 1);

        backend.off(id);
        assert_eq!(backend.listener_count("NewWave"), 0);
    }

    #[tokio::test]
    async fn unknown_reads_are_unsupported() {
        let backend = InMemoryBackend::default();
        assert!(matches!(
            backend.call("getAllWaves", &[]).await,
            Err(ContractError::Unsupported(_))
        ));
        assert_eq!(backend.read_calls(), 1);
    }
}
