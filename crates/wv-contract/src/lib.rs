//! Typed access to the deployed wave and voting contracts.
//!
//! `ContractBackend`/`EventSource` are the seam to whatever actually talks to
//! the chain (the in-page ethers bridge in the browser, `InMemoryBackend` in
//! tests); `ContractInterface` describes one contract's methods and events.

pub mod backend;
pub mod client;
pub mod error;
pub mod interface;
pub mod memory;
pub mod vote;
pub mod wave;

pub use backend::{
    ContractBackend, EventHandler, EventSource, ListenerId, TxHash, TxOverrides, TxReceipt,
};
pub use client::{ContractClient, PendingTx};
pub use error::{ContractError, GENERIC_FAILURE};
pub use interface::{ContractInterface, EncodedCall};
pub use memory::{InMemoryBackend, SendOutcome, SentTx};
pub use vote::{VoteAction, VoteEvent, VotingApp};
pub use wave::{WaveAction, WaveEvent, WavePortal};
