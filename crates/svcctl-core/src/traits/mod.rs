//! Seams between the session core and its environment.

mod navigator;
mod notifier;
mod storage;

pub use navigator::{Navigator, Route};
pub use notifier::{NotificationKind, Notifier};
pub use storage::SessionStorage;
