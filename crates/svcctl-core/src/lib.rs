//! svcctl-core - Session and authorization core for the service console.
//!
//! This crate holds everything the console needs that does not touch the
//! network: the [`SessionStore`] and its subscribers, rehydration from
//! durable storage, bearer-token expiry checks, role guards, the
//! notification feed, the busy indicator, and the API model types.
//!
//! # Example
//!
//! ```
//! use svcctl_core::{AccessToken, MemoryStorage, RefreshToken, Role, SessionStore, User};
//!
//! let store = SessionStore::new(MemoryStorage::new());
//! assert!(!store.is_authenticated());
//!
//! let user = User::new("u-1", "alice", "alice@example.com", Role::Admin);
//! store
//!     .set_session(user, AccessToken::new("tok"), RefreshToken::new("rtok"))
//!     .unwrap();
//! assert!(store.is_admin());
//! ```

pub mod busy;
pub mod credentials;
pub mod error;
pub mod expiry;
pub mod guard;
pub mod models;
pub mod notify;
pub mod session;
pub mod signal;
pub mod storage;
pub mod tokens;
pub mod traits;
pub mod types;

pub use busy::{BusyGuard, BusyTracker};
pub use credentials::Credentials;
pub use error::{ApiError, Error};
pub use notify::{Notification, NotificationCenter};
pub use session::{Bootstrap, SessionStore, bootstrap};
pub use signal::Signal;
pub use storage::{MemoryStorage, StoredSession};
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{Navigator, NotificationKind, Notifier, Route, SessionStorage};
pub use types::{ApiUrl, Role, User};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
