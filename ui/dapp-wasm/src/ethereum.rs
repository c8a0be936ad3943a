//! The injected EIP-1193 wallet, `window.ethereum`.

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wv_wallet::{ProviderError, WalletMethod, WalletProvider};

#[derive(Clone)]
pub struct InjectedProvider {
    ethereum: JsValue,
}

impl InjectedProvider {
    /// `None` when no wallet extension injected a provider.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self { ethereum })
    }

    pub fn as_js(&self) -> &JsValue {
        &self.ethereum
    }

    async fn request(&self, method: &str) -> Result<JsValue, ProviderError> {
        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(transport)?;

        let request: Function = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(transport)?
            .dyn_into()
            .map_err(transport)?;
        let promise = request.call1(&self.ethereum, &args).map_err(rpc_error)?;

        JsFuture::from(Promise::resolve(&promise))
            .await
            .map_err(rpc_error)
    }
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    async fn request_accounts(&self, method: WalletMethod) -> Result<Vec<String>, ProviderError> {
        let accounts = self.request(method.as_str()).await?;
        if !Array::is_array(&accounts) {
            return Err(ProviderError::Transport(format!(
                "{} returned {:?}",
                method.as_str(),
                accounts
            )));
        }
        Ok(Array::from(&accounts)
            .iter()
            .filter_map(|account| account.as_string())
            .collect())
    }
}

fn transport(err: JsValue) -> ProviderError {
    ProviderError::Transport(format!("{err:?}"))
}

/// EIP-1193 errors carry a numeric `code` and a `message`.
fn rpc_error(err: JsValue) -> ProviderError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_default();

    match code {
        Some(code) => ProviderError::from_rpc(code as i64, message),
        None if !message.is_empty() => ProviderError::Transport(message),
        None => transport(err),
    }
}
