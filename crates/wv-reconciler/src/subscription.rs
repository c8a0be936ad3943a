use std::mem;
use tracing::debug;
use wv_contract::{ContractError, EventHandler, EventSource, ListenerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Unsubscribed,
    Subscribed(ListenerId),
}

/// One listener for one event name. Dropping it detaches the listener.
pub struct Subscription<S: EventSource> {
    source: S,
    event: &'static str,
    state: SubscriptionState,
}

impl<S> Subscription<S>
where
    S: EventSource,
{
    pub fn new(source: S, event: &'static str) -> Self {
        Self {
            source,
            event,
            state: SubscriptionState::Unsubscribed,
        }
    }

    pub fn event(&self) -> &'static str {
        self.event
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    pub fn is_subscribed(&self) -> bool {
        matches!(self.state, SubscriptionState::Subscribed(_))
    }

    /// No-op when already subscribed; the existing handler stays attached.
    pub fn subscribe(&mut self, handler: EventHandler) -> Result<(), ContractError> {
        if self.is_subscribed() {
            debug!("{} already subscribed", self.event);
            return Ok(());
        }
        let id = self.source.on(self.event, handler)?;
        debug!("subscribed to {} as {:?}", self.event, id);
        self.state = SubscriptionState::Subscribed(id);
        Ok(())
    }

    pub fn unsubscribe(&mut self) {
        if let SubscriptionState::Subscribed(id) =
            mem::replace(&mut self.state, SubscriptionState::Unsubscribed)
        {
            self.source.off(id);
            debug!("unsubscribed from {}", self.event);
        }
    }
}

impl<S> Drop for Subscription<S>
where
    S: EventSource,
{
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
