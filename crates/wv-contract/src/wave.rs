use serde_json::{Value, json};
use wv_api_types::{WalletAddress, WaveMessage};

use crate::ContractError;
use crate::interface::{ContractInterface, EncodedCall, field, positional, string_arg, uint_arg};

pub const NEW_WAVE: &str = "NewWave";

/// The wave portal: anyone may leave a message.
pub struct WavePortal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaveAction {
    Wave { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaveEvent {
    NewWave(WaveMessage),
}

impl ContractInterface for WavePortal {
    type Record = WaveMessage;
    type Action = WaveAction;
    type Event = WaveEvent;

    const NAME: &'static str = "WavePortal";
    const READ_ALL: &'static str = "getAllWaves";
    const COUNT: Option<&'static str> = Some("getTotalWaves");
    const EVENTS: &'static [&'static str] = &[NEW_WAVE];
    const DEFAULT_GAS_LIMIT: Option<u64> = Some(300_000);

    fn decode_record(raw: &Value) -> Result<WaveMessage, ContractError> {
        let context = "wave";
        Ok(WaveMessage {
            address: WalletAddress(string_arg(field(raw, "waver", 0, context)?, context)?),
            timestamp: uint_arg(field(raw, "timestamp", 1, context)?)?,
            message: string_arg(field(raw, "message", 2, context)?, context)?,
        })
    }

    fn encode_action(action: &WaveAction) -> EncodedCall {
        match action {
            WaveAction::Wave { message } => EncodedCall {
                method: "wave",
                args: vec![json!(message)],
            },
        }
    }

    fn decode_event(event: &str, args: &[Value]) -> Result<WaveEvent, ContractError> {
        if event != NEW_WAVE {
            return Err(ContractError::Unsupported(format!("event {event}")));
        }
        let context = NEW_WAVE;
        Ok(WaveEvent::NewWave(WaveMessage {
            address: WalletAddress(string_arg(positional(args, 0, context)?, context)?),
            timestamp: uint_arg(positional(args, 1, context)?)?,
            message: string_arg(positional(args, 2, context)?, context)?,
        }))
    }

    fn success_message(_action: &WaveAction) -> &'static str {
        "Wave sent"
    }

    fn failure_message(_action: &WaveAction) -> &'static str {
        "Could not send wave"
    }
}
