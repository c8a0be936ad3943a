//! Transient toasts and the blocking alert.

use gloo_timers::callback::Timeout;
use tracing::{debug, warn};
use web_sys::Element;
use wv_api_types::{Notification, NotificationKind};
use wv_view::Notifier;

use crate::dom;

const TOAST_MS: u32 = 4_000;

pub struct ToastNotifier {
    container: Element,
}

impl ToastNotifier {
    pub fn new(container: Element) -> Self {
        Self { container }
    }
}

fn kind_class(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "toast toast-success",
        NotificationKind::Info => "toast toast-info",
        NotificationKind::Error => "toast toast-error",
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        debug!("toast {:?}: {}", notification.kind, notification.message);
        let class = kind_class(notification.kind);
        let Some(toast) = dom::text_element("div", class, &notification.message) else {
            return;
        };
        if self.container.append_child(&toast).is_err() {
            warn!("cannot show toast: {}", notification.message);
            return;
        }
        Timeout::new(TOAST_MS, move || toast.remove()).forget();
    }

    fn alert(&self, message: &str) {
        let shown = web_sys::window().map(|w| w.alert_with_message(message));
        if !matches!(shown, Some(Ok(()))) {
            warn!("cannot show alert: {}", message);
        }
    }
}
