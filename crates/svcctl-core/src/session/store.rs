//! The session store.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::AuthError;
use crate::signal::Signal;
use crate::storage::StoredSession;
use crate::tokens::{AccessToken, RefreshToken};
use crate::traits::SessionStorage;
use crate::types::{Role, User};
use crate::Result;

use super::bootstrap::Bootstrap;

/// An authenticated session: an identity and the tokens that prove it.
///
/// Holding the identity and the access token in one value means neither
/// can be present without the other.
#[derive(Clone)]
pub struct ActiveSession {
    user: User,
    access_token: AccessToken,
    refresh_token: Option<RefreshToken>,
}

impl ActiveSession {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }
}

impl fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveSession")
            .field("user", &self.user.username)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

/// In-memory session state; `None` when nobody is logged in.
pub type SessionState = Option<ActiveSession>;

/// A subscription to some projection of the session state.
pub type SessionSignal<T> = Signal<SessionState, T>;

/// Holds the current identity and tokens and mirrors them to durable storage.
///
/// The store is constructed once and handed to every component that needs
/// it; clones share the same state. All mutation goes through
/// [`set_session`](Self::set_session), [`update_identity`](Self::update_identity)
/// and [`clear_session`](Self::clear_session), which are serialized.
///
/// Every mutation is published to subscribers obtained from
/// [`subscribe`](Self::subscribe) and the `watch_*` methods.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<SessionState>,
    writer: Mutex<()>,
    bootstrap: OnceLock<Bootstrap>,
}

impl SessionStore {
    /// Create an empty store backed by `storage`.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self::with_storage(Arc::new(storage))
    }

    /// Create an empty store backed by shared `storage`.
    pub fn with_storage(storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            inner: Arc::new(StoreInner {
                storage,
                state,
                writer: Mutex::new(()),
                bootstrap: OnceLock::new(),
            }),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Returns the current identity, if a session is active.
    pub fn identity(&self) -> Option<User> {
        self.inner.state.borrow().as_ref().map(|s| s.user.clone())
    }

    /// Returns the current access token, if a session is active.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.inner
            .state
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Returns the current refresh token, if any.
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.inner
            .state
            .borrow()
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        is_authenticated(&self.inner.state.borrow())
    }

    pub fn is_admin(&self) -> bool {
        is_admin(&self.inner.state.borrow())
    }

    /// True for tenant admins and platform admins.
    pub fn is_tenant_admin(&self) -> bool {
        is_tenant_admin(&self.inner.state.borrow())
    }

    /// True when the active identity has exactly `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.inner
            .state
            .borrow()
            .as_ref()
            .is_some_and(|s| s.user.role == role)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Replace the session with a freshly authenticated one.
    ///
    /// The durable record is written first; if that fails the in-memory
    /// session is left as it was. Subscribers are notified before this
    /// returns.
    #[instrument(skip_all, fields(user = %user.username, role = %user.role))]
    pub fn set_session(
        &self,
        user: User,
        access_token: AccessToken,
        refresh_token: RefreshToken,
    ) -> Result<()> {
        let _writer = self.lock_writer();

        let record = StoredSession {
            token: Some(access_token.as_str().to_string()),
            refresh_token: Some(refresh_token.as_str().to_string()),
            user: Some(serde_json::to_string(&user)?),
        };
        self.inner.storage.save(&record)?;

        self.inner.state.send_replace(Some(ActiveSession {
            user,
            access_token,
            refresh_token: Some(refresh_token),
        }));

        info!("Session established");
        Ok(())
    }

    /// Replace the identity of the active session, keeping its tokens.
    #[instrument(skip_all, fields(user = %user.username))]
    pub fn update_identity(&self, user: User) -> Result<()> {
        let _writer = self.lock_writer();

        let current = self
            .inner
            .state
            .borrow()
            .clone()
            .ok_or(AuthError::NotAuthenticated)?;

        let record = StoredSession {
            token: Some(current.access_token.as_str().to_string()),
            refresh_token: current
                .refresh_token
                .as_ref()
                .map(|t| t.as_str().to_string()),
            user: Some(serde_json::to_string(&user)?),
        };
        self.inner.storage.save(&record)?;

        self.inner.state.send_replace(Some(ActiveSession {
            user,
            ..current
        }));

        debug!("Session identity updated");
        Ok(())
    }

    /// Drop the session from memory and from durable storage.
    ///
    /// Clearing an empty session notifies nobody. The in-memory session is
    /// gone even when removing the durable record fails; that failure is
    /// logged and returned.
    pub fn clear_session(&self) -> Result<()> {
        let _writer = self.lock_writer();

        let was_active = self.inner.state.send_if_modified(|state| state.take().is_some());

        let result = self.inner.storage.clear();
        if let Err(ref error) = result {
            warn!(%error, "Failed to remove stored session");
        }

        if was_active {
            info!("Session cleared");
        }
        result
    }

    /// Install a session rehydrated from storage without writing it back.
    pub(crate) fn restore(
        &self,
        user: User,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
    ) {
        let _writer = self.lock_writer();
        self.inner.state.send_replace(Some(ActiveSession {
            user,
            access_token,
            refresh_token,
        }));
    }

    pub(crate) fn storage(&self) -> &dyn SessionStorage {
        self.inner.storage.as_ref()
    }

    pub(crate) fn bootstrap_cell(&self) -> &OnceLock<Bootstrap> {
        &self.inner.bootstrap
    }

    fn lock_writer(&self) -> std::sync::MutexGuard<'_, ()> {
        self.inner
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Subscribe to the current identity.
    pub fn subscribe(&self) -> SessionSignal<Option<User>> {
        Signal::new(self.inner.state.subscribe(), |state| {
            state.as_ref().map(|s| s.user.clone())
        })
    }

    pub fn watch_authenticated(&self) -> SessionSignal<bool> {
        Signal::new(self.inner.state.subscribe(), is_authenticated)
    }

    pub fn watch_admin(&self) -> SessionSignal<bool> {
        Signal::new(self.inner.state.subscribe(), is_admin)
    }

    pub fn watch_tenant_admin(&self) -> SessionSignal<bool> {
        Signal::new(self.inner.state.subscribe(), is_tenant_admin)
    }
}

fn is_authenticated(state: &SessionState) -> bool {
    state.is_some()
}

fn is_admin(state: &SessionState) -> bool {
    state.as_ref().is_some_and(|s| s.user.role == Role::Admin)
}

fn is_tenant_admin(state: &SessionState) -> bool {
    state.as_ref().is_some_and(|s| s.user.role.is_tenant_admin())
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.state.borrow())
            .finish()
    }
}
