//! Session rehydration at process start.

use tracing::{debug, info, instrument, warn};

use crate::storage::StoredSession;
use crate::tokens::{AccessToken, RefreshToken};
use crate::types::User;

use super::store::SessionStore;

/// Outcome of rehydrating the session from durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    /// A stored session was found and installed.
    Restored(User),
    /// Nothing usable was stored.
    Empty,
    /// The stored record was damaged and has been cleared.
    Corrupted,
}

/// Rehydrate `store` from its durable storage.
///
/// Runs once per store: later calls return the first outcome without
/// touching storage again. No network call is made and the token is not
/// validated here; expiry is the job of [`crate::expiry`].
#[instrument(skip_all)]
pub fn bootstrap(store: &SessionStore) -> Bootstrap {
    store.bootstrap_cell().get_or_init(|| rehydrate(store)).clone()
}

fn rehydrate(store: &SessionStore) -> Bootstrap {
    let record = match store.storage().load() {
        Ok(record) => record,
        Err(error) => {
            warn!(%error, "Failed to read stored session, clearing it");
            // The store logs its own failure to clear.
            let _ = store.clear_session();
            return Bootstrap::Corrupted;
        }
    };

    let StoredSession {
        token,
        refresh_token,
        user,
    } = record;

    match (token, user) {
        (Some(token), Some(user_json)) => match serde_json::from_str::<User>(&user_json) {
            Ok(user) => {
                store.restore(
                    user.clone(),
                    AccessToken::new(token),
                    refresh_token.map(RefreshToken::new),
                );
                info!(user = %user.username, "Restored stored session");
                Bootstrap::Restored(user)
            }
            Err(error) => {
                warn!(%error, "Stored identity is corrupt, clearing session");
                let _ = store.clear_session();
                Bootstrap::Corrupted
            }
        },
        (None, None) if refresh_token.is_none() => Bootstrap::Empty,
        _ => {
            debug!("Stored session is incomplete, clearing it");
            let _ = store.clear_session();
            Bootstrap::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::Role;

    fn stored_user() -> String {
        serde_json::to_string(&User::new("u-1", "alice", "alice@example.com", Role::Admin))
            .unwrap()
    }

    fn store_with(record: StoredSession) -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::with_record(record));
        (SessionStore::with_storage(storage.clone()), storage)
    }

    #[test]
    fn restores_valid_record_offline() {
        let (store, _) = store_with(StoredSession {
            token: Some("tok".into()),
            refresh_token: Some("rtok".into()),
            user: Some(stored_user()),
        });

        let outcome = bootstrap(&store);

        assert!(matches!(outcome, Bootstrap::Restored(ref u) if u.username == "alice"));
        assert!(store.is_authenticated());
        assert!(store.is_admin());
        assert_eq!(store.refresh_token(), Some(RefreshToken::new("rtok")));
    }

    #[test]
    fn empty_storage_stays_empty() {
        let (store, _) = store_with(StoredSession::default());
        assert_eq!(bootstrap(&store), Bootstrap::Empty);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn corrupt_identity_clears_everything() {
        let (store, storage) = store_with(StoredSession {
            token: Some("tok".into()),
            refresh_token: Some("rtok".into()),
            user: Some("{not json".into()),
        });

        assert_eq!(bootstrap(&store), Bootstrap::Corrupted);
        assert!(!store.is_authenticated());
        assert!(storage.snapshot().is_empty());
    }

    #[test]
    fn identity_of_wrong_shape_is_corrupt() {
        let (store, _) = store_with(StoredSession {
            token: Some("tok".into()),
            refresh_token: None,
            user: Some(r#"{"username": "alice"}"#.into()),
        });

        assert_eq!(bootstrap(&store), Bootstrap::Corrupted);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn partial_record_is_cleared() {
        let (store, storage) = store_with(StoredSession {
            token: None,
            refresh_token: Some("rtok".into()),
            user: Some(stored_user()),
        });

        assert_eq!(bootstrap(&store), Bootstrap::Empty);
        assert!(!store.is_authenticated());
        assert!(storage.snapshot().is_empty());
    }

    #[test]
    fn runs_only_once() {
        let (store, storage) = store_with(StoredSession {
            token: Some("tok".into()),
            refresh_token: None,
            user: Some(stored_user()),
        });

        assert!(matches!(bootstrap(&store), Bootstrap::Restored(_)));
        store.clear_session().unwrap();
        crate::traits::SessionStorage::save(
            storage.as_ref(),
            &StoredSession {
                token: Some("other".into()),
                refresh_token: None,
                user: Some(stored_user()),
            },
        )
        .unwrap();

        assert!(matches!(bootstrap(&store), Bootstrap::Restored(_)));
        assert!(!store.is_authenticated());
    }
}
