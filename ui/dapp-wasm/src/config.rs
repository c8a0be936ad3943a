//! Deployment selection: the manifest compiled into the module, narrowed by
//! the page's query string.

use anyhow::{Context, Result};
use tracing::info;
use web_sys::UrlSearchParams;
use wv_api_types::{AppKind, DappConfig, DeploymentManifest};

const MANIFEST: &str = include_str!("../../../config/deployments.json");

/// `?app=wave|vote`, `?contract=0x...` and `?log=<filter>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOverrides {
    pub app: Option<String>,
    pub contract: Option<String>,
    pub log: Option<String>,
}

impl QueryOverrides {
    pub fn from_location() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let Ok(params) = UrlSearchParams::new_with_str(&search) else {
            return Self::default();
        };
        let get = |key: &str| params.get(key).filter(|v| !v.trim().is_empty());
        Self {
            app: get("app"),
            contract: get("contract"),
            log: get("log"),
        }
    }
}

pub fn load(overrides: &QueryOverrides) -> Result<DappConfig> {
    resolve(MANIFEST, overrides)
}

pub fn resolve(raw_manifest: &str, overrides: &QueryOverrides) -> Result<DappConfig> {
    let manifest =
        DeploymentManifest::from_json(raw_manifest).context("loading deployments.json")?;

    let app = match overrides.app.as_deref() {
        Some(name) => name.parse::<AppKind>()?,
        None => manifest.default_app,
    };
    let mut config = manifest.for_app(app)?.clone();

    if let Some(address) = overrides.contract.as_deref() {
        config = config
            .with_contract_address(address)
            .with_context(|| format!("contract override for {app}"))?;
    }

    info!("{} dApp at {}", config.app, config.contract_address);
    Ok(config)
}
