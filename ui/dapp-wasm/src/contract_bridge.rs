//! `ContractBackend` and `EventSource` over an ethers.js (v5) `Contract`.
//!
//! The page loads the ethers UMD bundle, which exposes a global `ethers`.
//! Arguments go in as JSON-compatible JS values; results come back through
//! `serde-wasm-bindgen`, so `BigNumber`s arrive as `{"_hex": ..}` objects
//! and structs as positional arrays.

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wv_api_types::DappConfig;
use wv_contract::{
    ContractBackend, ContractError, EventHandler, EventSource, ListenerId, TxHash, TxOverrides,
    TxReceipt,
};

/// ethers passes the decoded parameters followed by an `Event` object; four
/// slots cover every event the contracts emit.
type ListenerClosure = Closure<dyn FnMut(JsValue, JsValue, JsValue, JsValue)>;

pub struct EthersContract {
    /// `None` when the page has no wallet; every call then fails.
    contract: Option<JsValue>,
    transactions: RefCell<HashMap<TxHash, JsValue>>,
    listeners: RefCell<HashMap<ListenerId, (String, ListenerClosure)>>,
    next_listener: Cell<u64>,
}

impl EthersContract {
    pub fn connect(ethereum: Option<&JsValue>, config: &DappConfig) -> Result<Self, JsValue> {
        let contract = match ethereum {
            Some(ethereum) => Some(build_contract(ethereum, config)?),
            None => None,
        };
        Ok(Self {
            contract,
            transactions: RefCell::new(HashMap::new()),
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(0),
        })
    }

    fn contract(&self) -> Result<&JsValue, ContractError> {
        self.contract
            .as_ref()
            .ok_or_else(|| ContractError::Unsupported("contract access without a wallet".into()))
    }
}

/// `new ethers.Contract(address, abi, new ethers.providers.Web3Provider(ethereum).getSigner())`
fn build_contract(ethereum: &JsValue, config: &DappConfig) -> Result<JsValue, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let ethers = Reflect::get(&window, &JsValue::from_str("ethers"))?;
    if ethers.is_undefined() {
        return Err(JsValue::from_str("ethers.js is not loaded"));
    }

    let providers = Reflect::get(&ethers, &JsValue::from_str("providers"))?;
    let web3_provider: Function =
        Reflect::get(&providers, &JsValue::from_str("Web3Provider"))?.dyn_into()?;
    let provider = Reflect::construct(&web3_provider, &Array::of1(ethereum))?;
    let signer = call_method(&provider, "getSigner", &Array::new())?;

    let contract_ctor: Function =
        Reflect::get(&ethers, &JsValue::from_str("Contract"))?.dyn_into()?;
    let abi = serde_wasm_bindgen::to_value(&config.abi)?;
    Reflect::construct(
        &contract_ctor,
        &Array::of3(&JsValue::from_str(&config.contract_address), &abi, &signer),
    )
}

fn call_method(target: &JsValue, name: &str, args: &Array) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    Reflect::apply(&method, target, args)
}

async fn settle(value: JsValue) -> Result<JsValue, JsValue> {
    JsFuture::from(Promise::resolve(&value)).await
}

fn to_js_args(args: &[Value]) -> Result<Array, ContractError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let array = Array::new();
    for arg in args {
        let js = arg
            .serialize(&serializer)
            .map_err(|e| ContractError::Unsupported(format!("argument {arg}: {e}")))?;
        array.push(&js);
    }
    Ok(array)
}

fn from_js(value: JsValue) -> Result<Value, ContractError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| ContractError::decode("contract result", e.to_string()))
}

fn read_error(err: JsValue) -> ContractError {
    ContractError::from_read_error(&error_payload(&err))
}

fn write_error(err: JsValue) -> ContractError {
    ContractError::from_write_error(&error_payload(&err))
}

/// Copies the fields reason extraction looks at out of a JS error. `Error`
/// properties are not enumerable, so they are read one by one.
fn error_payload(err: &JsValue) -> Value {
    let get = |target: &JsValue, key: &str| Reflect::get(target, &JsValue::from_str(key)).ok();
    let text = |target: &JsValue, key: &str| get(target, key).and_then(|v| v.as_string());

    let mut payload = Map::new();
    if let Some(code) = get(err, "code") {
        if let Some(n) = code.as_f64() {
            payload.insert("code".into(), json!(n as i64));
        } else if let Some(s) = code.as_string() {
            payload.insert("code".into(), Value::String(s));
        }
    }
    for nested in ["error", "data"] {
        let message = get(err, nested)
            .filter(JsValue::is_object)
            .and_then(|inner| text(&inner, "message"));
        if let Some(message) = message {
            payload.insert(nested.into(), json!({ "message": message }));
        }
    }
    for key in ["reason", "message"] {
        if let Some(value) = text(err, key) {
            payload.insert(key.into(), Value::String(value));
        }
    }

    if payload.is_empty() {
        return err.as_string().map(Value::String).unwrap_or(Value::Null);
    }
    Value::Object(payload)
}

fn receipt_from_js(tx_hash: &TxHash, receipt: &JsValue) -> TxReceipt {
    let number = |key: &str| {
        Reflect::get(receipt, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    };
    TxReceipt {
        tx_hash: tx_hash.clone(),
        block_number: number("blockNumber").map(|n| n as u64),
        // Pre-Byzantium receipts have no status.
        success: number("status").is_none_or(|status| status == 1.0),
    }
}

/// Prefers the decoded `args` of the trailing ethers `Event`; falls back to
/// the raw positional parameters.
fn event_args(raw: [JsValue; 4]) -> Result<Vec<Value>, ContractError> {
    let supplied: Vec<JsValue> = raw.into_iter().take_while(|v| !v.is_undefined()).collect();
    let Some((last, params)) = supplied.split_last() else {
        return Err(ContractError::decode("event", "listener called without arguments"));
    };

    let decoded = Reflect::get(last, &JsValue::from_str("args"))
        .ok()
        .filter(Array::is_array);
    match decoded {
        Some(args) => Array::from(&args).iter().map(from_js).collect(),
        None => params.iter().cloned().map(from_js).collect(),
    }
}

#[async_trait(?Send)]
impl ContractBackend for EthersContract {
    async fn call(&self, method: &str, args: &[Value]) -> Result<Value, ContractError> {
        let contract = self.contract()?;
        let js_args = to_js_args(args)?;
        let pending = call_method(contract, method, &js_args).map_err(read_error)?;
        let result = settle(pending).await.map_err(read_error)?;
        from_js(result)
    }

    async fn send(
        &self,
        method: &str,
        args: &[Value],
        overrides: &TxOverrides,
    ) -> Result<TxHash, ContractError> {
        let contract = self.contract()?;
        let js_args = to_js_args(args)?;
        if let Some(gas_limit) = overrides.gas_limit {
            let tx_overrides = Object::new();
            Reflect::set(
                &tx_overrides,
                &JsValue::from_str("gasLimit"),
                &JsValue::from_f64(gas_limit as f64),
            )
            .map_err(write_error)?;
            js_args.push(&tx_overrides);
        }

        let pending = call_method(contract, method, &js_args).map_err(write_error)?;
        let response = settle(pending).await.map_err(write_error)?;
        let hash = Reflect::get(&response, &JsValue::from_str("hash"))
            .ok()
            .and_then(|h| h.as_string())
            .ok_or_else(|| ContractError::decode(method, "transaction response without hash"))?;

        let tx_hash = TxHash(hash);
        debug!("{} sent as {}", method, tx_hash);
        self.transactions
            .borrow_mut()
            .insert(tx_hash.clone(), response);
        Ok(tx_hash)
    }

    async fn wait(&self, tx_hash: &TxHash) -> Result<TxReceipt, ContractError> {
        let response = self
            .transactions
            .borrow_mut()
            .remove(tx_hash)
            .ok_or_else(|| ContractError::Provider(format!("unknown transaction {tx_hash}")))?;

        let pending = call_method(&response, "wait", &Array::new()).map_err(write_error)?;
        match settle(pending).await {
            Ok(receipt) => Ok(receipt_from_js(tx_hash, &receipt)),
            Err(err) => {
                // ethers rejects mined-but-reverted transactions with the receipt attached.
                let receipt = Reflect::get(&err, &JsValue::from_str("receipt"))
                    .ok()
                    .filter(JsValue::is_object);
                match receipt {
                    Some(receipt) => Ok(receipt_from_js(tx_hash, &receipt)),
                    None => Err(write_error(err)),
                }
            }
        }
    }
}

impl EventSource for EthersContract {
    fn on(&self, event: &str, mut handler: EventHandler) -> Result<ListenerId, ContractError> {
        let contract = self.contract()?;
        let name = event.to_owned();
        let closure: ListenerClosure = Closure::wrap(Box::new(
            move |a: JsValue, b: JsValue, c: JsValue, d: JsValue| match event_args([a, b, c, d]) {
                Ok(args) => handler(args),
                Err(err) => warn!("dropping {} event: {}", name, err),
            },
        )
            as Box<dyn FnMut(JsValue, JsValue, JsValue, JsValue)>);

        call_method(
            contract,
            "on",
            &Array::of2(&JsValue::from_str(event), closure.as_ref()),
        )
        .map_err(read_error)?;

        let id = ListenerId(self.next_listener.get() + 1);
        self.next_listener.set(id.0);
        self.listeners
            .borrow_mut()
            .insert(id, (event.to_owned(), closure));
        Ok(id)
    }

    fn off(&self, listener: ListenerId) {
        let removed = self.listeners.borrow_mut().remove(&listener);
        let (Some((event, closure)), Some(contract)) = (removed, self.contract.as_ref()) else {
            return;
        };
        let detached = call_method(
            contract,
            "off",
            &Array::of2(&JsValue::from_str(&event), closure.as_ref()),
        );
        if let Err(err) = detached {
            warn!("cannot detach {} listener: {:?}", event, err);
        }
    }
}
