//! Wave portal and voting dApp frontend.
//!
//! Rust + WASM page glue around the `wv-*` crates: the injected wallet and
//! the ethers.js contract are adapted to their traits here, everything else
//! lives in the core crates.

pub mod app;
pub mod config;
pub mod contract_bridge;
pub mod dom;
pub mod ethereum;
pub mod events;
pub mod logging;
pub mod render;
pub mod state;
pub mod toast;

use wasm_bindgen::prelude::*;

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let overrides = config::QueryOverrides::from_location();
    logging::init(overrides.log.as_deref());

    app::boot(overrides)
        .await
        .map_err(|err| JsValue::from_str(&format!("{err:#}")))
}
