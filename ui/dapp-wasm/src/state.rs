//! The mounted page.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Holding the controller here keeps it, its listeners and its closures
//! alive for the lifetime of the page.

use std::cell::RefCell;
use std::rc::Rc;
use wv_contract::{VotingApp, WavePortal};
use wv_view::DappController;

use crate::contract_bridge::EthersContract;
use crate::ethereum::InjectedProvider;

pub type WaveController = DappController<WavePortal, InjectedProvider, EthersContract>;
pub type VoteController = DappController<VotingApp, InjectedProvider, EthersContract>;

pub enum Page {
    Wave(Rc<WaveController>),
    Vote(Rc<VoteController>),
}

impl Page {
    pub fn unmount(&self) {
        match self {
            Page::Wave(controller) => controller.unmount(),
            Page::Vote(controller) => controller.unmount(),
        }
    }
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

pub fn install(page: Page) {
    let previous = PAGE.with(|p| p.borrow_mut().replace(page));
    if let Some(previous) = previous {
        previous.unmount();
    }
}

pub fn take() -> Option<Page> {
    PAGE.with(|p| p.borrow_mut().take())
}
