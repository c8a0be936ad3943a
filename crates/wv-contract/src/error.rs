use serde_json::Value;
use thiserror::Error;
use wv_api_types::ConversionError;

pub const GENERIC_FAILURE: &str = "Transaction failed";

const REVERT_PREFIX: &str = "execution reverted: ";

// Where wallets and ethers put a human-readable reason, most specific first.
const REASON_POINTERS: [&str; 4] = ["/error/message", "/data/message", "/reason", "/message"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("{}", .reason.as_deref().unwrap_or(GENERIC_FAILURE))]
    Reverted { reason: Option<String> },
    #[error("transaction rejected in wallet")]
    UserRejected,
    #[error("provider error: {0}")]
    Provider(String),
    #[error("cannot decode {context}: {detail}")]
    Decode { context: String, detail: String },
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error("{0} is not supported by this contract")]
    Unsupported(String),
}

impl ContractError {
    pub fn decode(context: impl Into<String>, detail: impl Into<String>) -> Self {
        ContractError::Decode {
            context: context.into(),
            detail: detail.into(),
        }
    }

    /// Classifies a failed write from the provider's error payload.
    pub fn from_write_error(payload: &Value) -> Self {
        if is_user_rejection(payload) {
            return ContractError::UserRejected;
        }
        ContractError::Reverted {
            reason: extract_reason(payload),
        }
    }

    /// Classifies a failed read; reads never carry a user-facing reason.
    pub fn from_read_error(payload: &Value) -> Self {
        let detail = extract_reason(payload).unwrap_or_else(|| payload.to_string());
        ContractError::Provider(detail)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ContractError::Reverted { reason } => reason.as_deref(),
            _ => None,
        }
    }

    /// Text for an error notification: the reported reason when there is
    /// one, otherwise the action's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.reason().unwrap_or(fallback).to_owned()
    }
}

fn is_user_rejection(payload: &Value) -> bool {
    match payload.get("code") {
        Some(Value::Number(n)) => n.as_i64() == Some(4001),
        Some(Value::String(s)) => s == "ACTION_REJECTED",
        _ => false,
    }
}

fn extract_reason(payload: &Value) -> Option<String> {
    if let Value::String(s) = payload {
        return clean_reason(s);
    }
    REASON_POINTERS
        .iter()
        .filter_map(|ptr| payload.pointer(ptr).and_then(Value::as_str))
        .find_map(clean_reason)
}

fn clean_reason(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(REVERT_PREFIX).unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_provider_message_wins() {
        let payload = json!({
            "code": -32603,
            "message": "Internal JSON-RPC error.",
            "error": { "code": 3, "message": "execution reverted: insufficient funds" }
        });

        let err = ContractError::from_write_error(&payload);
        assert_eq!(
            err,
            ContractError::Reverted {
                reason: Some("insufficient funds".to_owned())
            }
        );
        assert_eq!(err.to_string(), "insufficient funds");
    }

    #[test]
    fn falls_back_through_data_reason_and_message() {
        let data = json!({ "data": { "message": "already voted" }, "message": "outer" });
        assert_eq!(ContractError::from_write_error(&data).reason(), Some("already voted"));

        let reason = json!({ "reason": "name required", "message": "outer" });
        assert_eq!(ContractError::from_write_error(&reason).reason(), Some("name required"));

        let message = json!({ "message": "nonce too low" });
        assert_eq!(ContractError::from_write_error(&message).reason(), Some("nonce too low"));
    }

    #[test]
    fn missing_reason_uses_fallback() {
        let err = ContractError::from_write_error(&json!({ "code": "CALL_EXCEPTION" }));
        assert_eq!(err.reason(), None);
        assert_eq!(err.to_string(), GENERIC_FAILURE);
        assert_eq!(err.user_message("Could not add new candidate"), "Could not add new candidate");
    }

    #[test]
    fn rejection_codes_are_recognised() {
        assert_eq!(
            ContractError::from_write_error(&json!({ "code": 4001, "message": "User denied" })),
            ContractError::UserRejected
        );
        assert_eq!(
            ContractError::from_write_error(&json!({ "code": "ACTION_REJECTED" })),
            ContractError::UserRejected
        );
    }

    #[test]
    fn read_errors_keep_some_detail() {
        let err = ContractError::from_read_error(&json!({ "message": "network down" }));
        assert_eq!(err, ContractError::Provider("network down".to_owned()));

        let err = ContractError::from_read_error(&json!({ "code": 1 }));
        assert_eq!(err, ContractError::Provider(r#"{"code":1}"#.to_owned()));
    }
}
