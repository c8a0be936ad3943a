//! Static description of a deployed contract: which methods to call, how
//! records and events decode, and how actions encode.

use serde_json::Value;
use std::fmt::Debug;
use wv_api_types::{Keyed, parse_uint};

use crate::ContractError;

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCall {
    pub method: &'static str,
    pub args: Vec<Value>,
}

pub trait ContractInterface: 'static {
    type Record: Keyed + Clone + Debug + 'static;
    type Action: Clone + Debug;
    type Event: Clone + Debug + 'static;

    const NAME: &'static str;
    /// Returns every record in on-chain insertion order.
    const READ_ALL: &'static str;
    /// Scalar tally method, if the contract has one.
    const COUNT: Option<&'static str>;
    const EVENTS: &'static [&'static str];
    const DEFAULT_GAS_LIMIT: Option<u64>;

    fn decode_record(raw: &Value) -> Result<Self::Record, ContractError>;
    fn encode_action(action: &Self::Action) -> EncodedCall;
    fn decode_event(event: &str, args: &[Value]) -> Result<Self::Event, ContractError>;

    fn success_message(action: &Self::Action) -> &'static str;
    /// Shown when a write fails without a reported reason.
    fn failure_message(action: &Self::Action) -> &'static str;
}

/// Looks a struct field up by name, or by position when the bridge
/// delivered the struct as a tuple.
pub(crate) fn field<'a>(
    raw: &'a Value,
    name: &str,
    index: usize,
    context: &str,
) -> Result<&'a Value, ContractError> {
    let found = match raw {
        Value::Object(map) => map.get(name),
        Value::Array(items) => items.get(index),
        _ => None,
    };
    found.ok_or_else(|| ContractError::decode(context, format!("missing field `{name}`")))
}

pub(crate) fn string_arg(value: &Value, context: &str) -> Result<String, ContractError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| ContractError::decode(context, format!("expected string, got {value}")))
}

pub(crate) fn uint_arg(value: &Value) -> Result<u64, ContractError> {
    Ok(parse_uint(value)?)
}

pub(crate) fn positional<'a>(
    args: &'a [Value],
    index: usize,
    context: &str,
) -> Result<&'a Value, ContractError> {
    args.get(index).ok_or_else(|| {
        ContractError::decode(context, format!("expected at least {} arguments", index + 1))
    })
}
