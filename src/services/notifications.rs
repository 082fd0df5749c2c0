//! Notification sinks and the pending-notice guard.

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::domain::models::{Notification, NotificationToken};
use crate::domain::ports::NotificationSink;

/// Message used when a mutation is abandoned before it settled.
pub const ABANDONED_MESSAGE: &str = "Operation was cancelled before it completed";

/// A "started" notice that must be settled exactly once.
///
/// `succeed` and `fail` consume the notice, so a second terminal
/// notification cannot be expressed. Dropping an unsettled notice emits
/// [`Notification::Failed`].
pub struct PendingNotice<'a, N: NotificationSink + ?Sized> {
    sink: &'a N,
    token: NotificationToken,
    settled: bool,
}

impl<'a, N: NotificationSink + ?Sized> PendingNotice<'a, N> {
    pub fn start(sink: &'a N, description: impl Into<String>) -> Self {
        let token = NotificationToken::new();
        sink.notify(Notification::Started {
            token,
            description: description.into(),
        });
        Self {
            sink,
            token,
            settled: false,
        }
    }

    pub const fn token(&self) -> NotificationToken {
        self.token
    }

    pub fn succeed(mut self, message: impl Into<String>) {
        self.settled = true;
        self.sink.notify(Notification::Succeeded {
            token: self.token,
            message: message.into(),
        });
    }

    pub fn fail(mut self, message: impl Into<String>) {
        self.settled = true;
        self.sink.notify(Notification::Failed {
            token: self.token,
            message: message.into(),
        });
    }
}

impl<N: NotificationSink + ?Sized> Drop for PendingNotice<'_, N> {
    fn drop(&mut self) {
        if !self.settled {
            self.sink.notify(Notification::Failed {
                token: self.token,
                message: ABANDONED_MESSAGE.to_string(),
            });
        }
    }
}

/// Logs notifications through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Started { token, description } => {
                info!(%token, "{description}");
            }
            Notification::Succeeded { token, message } => {
                info!(%token, "{message}");
            }
            Notification::Failed { token, message } => {
                warn!(%token, "{message}");
            }
        }
    }
}

/// Fans notifications out to any number of subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

impl NotificationSink for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        // No subscribers is fine.
        let _ = self.sender.send(notification);
    }
}
