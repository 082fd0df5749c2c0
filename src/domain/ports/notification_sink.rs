//! Notification sink port.

use crate::domain::models::Notification;

/// Receives mutation progress for display ("toasts", spinners, logs).
///
/// Sinks are called synchronously from the mutation path and must not block.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}
