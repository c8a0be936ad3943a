//! Attaches one subscription per contract event and feeds decoded events
//! into the store.
//!
//! Handlers only decode their payload and dispatch; they never read the
//! record list, so the record list can change without re-subscribing.

use serde_json::Value;
use std::marker::PhantomData;
use std::rc::Rc;
use tracing::{info, warn};
use wv_api_types::Notification;
use wv_contract::{ContractError, ContractInterface, EventHandler, EventSource};

use crate::store::{Effect, Msg, Reduce, Store};
use crate::subscription::Subscription;

/// Side channels for what an event asks of the page.
#[derive(Clone)]
pub struct ReconcilerHooks {
    pub on_refetch: Rc<dyn Fn()>,
    pub on_notice: Rc<dyn Fn(Notification)>,
}

impl ReconcilerHooks {
    pub fn silent() -> Self {
        Self {
            on_refetch: Rc::new(|| {}),
            on_notice: Rc::new(|_: Notification| {}),
        }
    }
}

pub struct EventReconciler<C, S>
where
    C: ContractInterface,
    S: EventSource,
{
    subscriptions: Vec<Subscription<S>>,
    store: Rc<Store<C::Record>>,
    _contract: PhantomData<fn() -> C>,
}

impl<C, S> EventReconciler<C, S>
where
    C: ContractInterface,
    C::Event: Reduce<C::Record>,
    S: EventSource + Clone,
{
    pub fn new(source: S, store: Rc<Store<C::Record>>) -> Self {
        let subscriptions = C::EVENTS
            .iter()
            .map(|&event| Subscription::new(source.clone(), event))
            .collect();
        Self {
            subscriptions,
            store,
            _contract: PhantomData,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscriptions.iter().all(Subscription::is_subscribed)
    }

    /// Subscribes to every event of the contract. On failure nothing stays
    /// attached.
    pub fn attach(&mut self, hooks: &ReconcilerHooks) -> Result<(), ContractError> {
        for i in 0..self.subscriptions.len() {
            let event = self.subscriptions[i].event();
            let handler = handler_for::<C>(event, Rc::clone(&self.store), hooks.clone());
            if let Err(err) = self.subscriptions[i].subscribe(handler) {
                warn!("cannot subscribe to {}.{}: {}", C::NAME, event, err);
                self.detach();
                return Err(err);
            }
        }
        info!("listening for {} events", C::NAME);
        Ok(())
    }

    pub fn detach(&mut self) {
        for subscription in &mut self.subscriptions {
            subscription.unsubscribe();
        }
    }
}

fn handler_for<C>(
    event: &'static str,
    store: Rc<Store<C::Record>>,
    hooks: ReconcilerHooks,
) -> EventHandler
where
    C: ContractInterface,
    C::Event: Reduce<C::Record>,
{
    Box::new(move |args: Vec<Value>| {
        let decoded = match C::decode_event(event, &args) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!("dropping {}.{} event: {}", C::NAME, event, err);
                return;
            }
        };
        info!("{}.{} {:?}", C::NAME, event, decoded);

        let notice = decoded.notice();
        let effect = store.dispatch(Msg::Event(decoded));
        if let Some(notice) = notice {
            (hooks.on_notice)(notice);
        }
        if effect == Effect::Refetch {
            (hooks.on_refetch)();
        }
    })
}
