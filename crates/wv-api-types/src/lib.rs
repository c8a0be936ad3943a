use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

pub mod config;
pub mod convert;

pub use config::{AppKind, ConfigError, DappConfig, DeploymentManifest};
pub use convert::{ConversionError, format_date, format_date_in, parse_uint};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Lowercased form used for comparisons; checksummed and plain hex
    /// addresses refer to the same account.
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    pub fn same_account(&self, other: &WalletAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    pub fn short(&self) -> String {
        if self.0.is_ascii() && self.0.len() > 10 {
            format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record with a stable identity derived from on-chain data.
pub trait Keyed {
    type Key: Clone + Eq + Hash + fmt::Debug;

    fn key(&self) -> Self::Key;

    /// Folds in the copy of this record an event last produced, when a bulk
    /// read that may predate the event replaces the list.
    fn absorb(&mut self, _from_event: &Self) {}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaveMessage {
    pub address: WalletAddress,
    /// Unix seconds as reported by the contract.
    pub timestamp: u64,
    pub message: String,
}

impl Keyed for WaveMessage {
    type Key = (String, u64, String);

    fn key(&self) -> Self::Key {
        (self.address.normalized(), self.timestamp, self.message.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub id: RecordId,
    pub name: String,
    pub votes: u64,
}

impl Keyed for Candidate {
    type Key = RecordId;

    fn key(&self) -> Self::Key {
        self.id
    }

    // Tallies only grow on-chain.
    fn absorb(&mut self, from_event: &Self) {
        self.votes = self.votes.max(from_event.votes);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum TxState {
    #[default]
    Idle,
    /// Handed to the wallet, no hash yet.
    Submitting,
    Pending { tx_hash: String },
    Confirmed { tx_hash: String },
    Failed { reason: String },
}

impl TxState {
    pub fn in_flight(&self) -> bool {
        matches!(self, TxState::Submitting | TxState::Pending { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            TxState::Idle => "idle",
            TxState::Submitting => "awaiting wallet",
            TxState::Pending { .. } => "pending",
            TxState::Confirmed { .. } => "confirmed",
            TxState::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_keys_ignore_address_case() {
        let a = WaveMessage {
            address: WalletAddress("0xAbCdEf0000000000000000000000000000000001".to_owned()),
            timestamp: 1_700_000_000,
            message: "gm".to_owned(),
        };
        let mut b = a.clone();
        b.address = WalletAddress(a.address.0.to_ascii_lowercase());

        assert_eq!(a.key(), b.key());
        assert!(a.address.same_account(&b.address));
    }

    #[test]
    fn short_address_keeps_both_ends() {
        let addr = WalletAddress("0x1234567890abcdef1234567890abcdef12345678".to_owned());
        assert_eq!(addr.short(), "0x1234...5678");
        assert_eq!(WalletAddress("0x12".to_owned()).short(), "0x12");
    }

    #[test]
    fn only_submitting_and_pending_are_in_flight() {
        assert!(TxState::Submitting.in_flight());
        assert!(
            TxState::Pending {
                tx_hash: "0x1".into(),
            }
            .in_flight()
        );
        assert!(!TxState::Idle.in_flight());
        assert!(
            !TxState::Confirmed {
                tx_hash: "0x1".into(),
            }
            .in_flight()
        );
        assert!(
            !TxState::Failed {
                reason: "nope".into(),
            }
            .in_flight()
        );
    }

    #[test]
    fn candidates_absorb_the_higher_tally() {
        let mut read = Candidate {
            id: RecordId(0),
            name: "Ada".to_owned(),
            votes: 2,
        };
        let mut seen = read.clone();
        seen.votes = 3;

        read.absorb(&seen);
        assert_eq!(read.votes, 3);

        seen.votes = 1;
        read.absorb(&seen);
        assert_eq!(read.votes, 3);
    }
}
