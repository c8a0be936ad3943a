//! Event reconciliation: a keyed record store driven by one reducer, plus
//! the subscriptions that feed contract events into it.

pub mod reconciler;
pub mod reducers;
pub mod store;
pub mod subscription;

pub use reconciler::{EventReconciler, ReconcilerHooks};
pub use store::{Effect, Msg, Records, Reduce, Store};
pub use subscription::{Subscription, SubscriptionState};
