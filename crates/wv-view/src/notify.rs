use std::cell::RefCell;
use tracing::info;
use wv_api_types::Notification;

/// Where user-facing messages go: transient toasts and the blocking alert.
pub trait Notifier {
    fn notify(&self, notification: Notification);
    fn alert(&self, message: &str);
}

/// Keeps everything it is told, for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: RefCell<Vec<Notification>>,
    alerts: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        info!("notification {:?}: {}", notification.kind, notification.message);
        self.notifications.borrow_mut().push(notification);
    }

    fn alert(&self, message: &str) {
        info!("alert: {}", message);
        self.alerts.borrow_mut().push(message.to_owned());
    }
}
