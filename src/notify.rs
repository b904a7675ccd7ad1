//! Transient notifications: short-lived messages that expire on their own.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::view::DocsView;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Shows messages through the view and removes each one after its own TTL.
///
/// Must be used from inside a tokio runtime; expiry runs on a spawned task.
#[derive(Clone)]
pub struct Notifier {
    view: Arc<dyn DocsView>,
    active: Arc<Mutex<Vec<Notification>>>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(view: Arc<dyn DocsView>) -> Self {
        Self::with_ttl(view, NOTIFICATION_TTL)
    }

    pub fn with_ttl(view: Arc<dyn DocsView>, ttl: Duration) -> Self {
        Self {
            view,
            active: Arc::new(Mutex::new(Vec::new())),
            ttl,
        }
    }

    /// Show `message` and schedule its removal. Never blocks.
    pub fn notify(&self, message: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = notification.id;
        tracing::debug!(%id, message = %notification.message, "notification shown");

        self.view.show_notification(&notification);
        self.active.lock().push(notification);

        let this = self.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            this.dismiss(id);
        });
        id
    }

    /// Remove a notification early. Removing one that already expired is a no-op.
    pub fn dismiss(&self, id: Uuid) {
        let removed = {
            let mut active = self.active.lock();
            let before = active.len();
            active.retain(|n| n.id != id);
            active.len() != before
        };
        if removed {
            self.view.dismiss_notification(id);
        }
    }

    /// Currently visible notifications, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.active.lock().clone()
    }
}
