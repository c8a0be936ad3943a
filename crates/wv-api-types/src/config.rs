//! Deployment configuration.
//!
//! One manifest lists every deployed contract the frontends know about.
//! Each entry names the app it drives, the contract address and the
//! human-readable ABI fragments handed to the in-page contract runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppKind {
    Wave,
    Vote,
}

impl AppKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppKind::Wave => "wave",
            AppKind::Vote => "vote",
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wave" => Ok(AppKind::Wave),
            "vote" => Ok(AppKind::Vote),
            other => Err(ConfigError::UnknownApp(other.to_owned())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid deployment manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid contract address: {0}")]
    InvalidAddress(String),
    #[error("deployment for {0} has an empty ABI")]
    EmptyAbi(AppKind),
    #[error("no deployment configured for {0}")]
    MissingDeployment(AppKind),
    #[error("unknown app: {0}")]
    UnknownApp(String),
}

fn default_wallet_install_url() -> String {
    "https://metamask.io/download/".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DappConfig {
    pub app: AppKind,
    pub title: String,
    pub contract_address: String,
    pub abi: Vec<String>,
    /// Overrides the contract's default gas ceiling for writes.
    #[serde(default)]
    pub gas_limit: Option<u64>,
    #[serde(default = "default_wallet_install_url")]
    pub wallet_install_url: String,
}

impl DappConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_address(&self.contract_address) {
            return Err(ConfigError::InvalidAddress(self.contract_address.clone()));
        }
        if self.abi.iter().all(|fragment| fragment.trim().is_empty()) {
            return Err(ConfigError::EmptyAbi(self.app));
        }
        if self.contract_address.eq_ignore_ascii_case(ZERO_ADDRESS) {
            warn!("{} contract address is not configured (zero address)", self.app);
        }
        Ok(())
    }

    pub fn with_contract_address(mut self, address: &str) -> Result<Self, ConfigError> {
        let address = address.trim();
        if !is_address(address) {
            return Err(ConfigError::InvalidAddress(address.to_owned()));
        }
        self.contract_address = address.to_owned();
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentManifest {
    pub default_app: AppKind,
    pub deployments: Vec<DappConfig>,
}

impl DeploymentManifest {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let manifest: DeploymentManifest = serde_json::from_str(raw)?;
        for deployment in &manifest.deployments {
            deployment.validate()?;
        }
        Ok(manifest)
    }

    pub fn for_app(&self, app: AppKind) -> Result<&DappConfig, ConfigError> {
        self.deployments
            .iter()
            .find(|d| d.app == app)
            .ok_or(ConfigError::MissingDeployment(app))
    }
}

fn is_address(candidate: &str) -> bool {
    candidate
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
