//! In-process notification feed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::signal::Signal;
use crate::traits::{NotificationKind, Notifier};

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// Keeps every notification shown this session, newest first.
///
/// Implements [`Notifier`], so it can be handed to the request pipeline
/// directly; presentation layers subscribe to the feed.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    feed: Arc<watch::Sender<Vec<Notification>>>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        let (feed, _) = watch::channel(Vec::new());
        Self {
            feed: Arc::new(feed),
        }
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_success(&self, message: &str) -> String {
        self.show(NotificationKind::Success, NotificationKind::Success.title(), message)
    }

    pub fn show_error(&self, message: &str) -> String {
        self.show(NotificationKind::Error, NotificationKind::Error.title(), message)
    }

    pub fn show_warning(&self, message: &str) -> String {
        self.show(NotificationKind::Warning, NotificationKind::Warning.title(), message)
    }

    pub fn show_info(&self, message: &str) -> String {
        self.show(NotificationKind::Info, NotificationKind::Info.title(), message)
    }

    /// Add a notification and return its id.
    pub fn show(&self, kind: NotificationKind, title: &str, message: &str) -> String {
        debug!(%kind, text = message, "Notification");

        let notification = Notification {
            id: Uuid::new_v4().simple().to_string(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
            read: false,
        };
        let id = notification.id.clone();
        self.feed.send_modify(|feed| feed.insert(0, notification));
        id
    }

    pub fn mark_as_read(&self, id: &str) {
        self.feed.send_if_modified(|feed| {
            let mut modified = false;
            for n in feed.iter_mut().filter(|n| n.id == id && !n.read) {
                n.read = true;
                modified = true;
            }
            modified
        });
    }

    pub fn mark_all_as_read(&self) {
        self.feed.send_if_modified(|feed| {
            let unread = feed.iter().any(|n| !n.read);
            feed.iter_mut().for_each(|n| n.read = true);
            unread
        });
    }

    pub fn remove(&self, id: &str) {
        self.feed.send_if_modified(|feed| {
            let before = feed.len();
            feed.retain(|n| n.id != id);
            feed.len() != before
        });
    }

    pub fn clear_all(&self) {
        self.feed.send_if_modified(|feed| {
            let had_any = !feed.is_empty();
            feed.clear();
            had_any
        });
    }

    pub fn unread_count(&self) -> usize {
        self.feed.borrow().iter().filter(|n| !n.read).count()
    }

    /// Snapshot of the feed, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.feed.borrow().clone()
    }

    pub fn subscribe(&self) -> Signal<Vec<Notification>, Vec<Notification>> {
        Signal::new(self.feed.subscribe(), |feed| feed.clone())
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.show(kind, kind.title(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_with_default_titles() {
        let center = NotificationCenter::new();
        center.show_info("first");
        center.show_error("second");

        let feed = center.notifications();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].message, "second");
        assert_eq!(feed[0].title, "Error");
        assert_eq!(feed[1].kind, NotificationKind::Info);
    }

    #[test]
    fn read_tracking() {
        let center = NotificationCenter::new();
        let a = center.show_success("saved");
        center.show_warning("slow");
        assert_eq!(center.unread_count(), 2);

        center.mark_as_read(&a);
        assert_eq!(center.unread_count(), 1);

        center.mark_all_as_read();
        assert_eq!(center.unread_count(), 0);
    }

    #[test]
    fn remove_and_clear() {
        let center = NotificationCenter::new();
        let a = center.show_info("one");
        center.show_info("two");

        center.remove(&a);
        assert_eq!(center.notifications().len(), 1);

        center.clear_all();
        assert!(center.notifications().is_empty());
    }

    #[test]
    fn notifier_impl_feeds_center() {
        let center = NotificationCenter::new();
        let signal = center.subscribe();
        let notifier: &dyn Notifier = &center;

        notifier.notify(NotificationKind::Error, "Service not found");

        assert!(signal.has_changed());
        assert_eq!(signal.get()[0].message, "Service not found");
    }
}
