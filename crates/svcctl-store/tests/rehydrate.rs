//! A session written by one process is restored by the next.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use svcctl_core::{AccessToken, Bootstrap, RefreshToken, Role, SessionStore, User, bootstrap};
use svcctl_store::FileStorage;

fn alice() -> User {
    User::new("u-1", "alice", "alice@example.com", Role::TenantAdmin)
}

#[test]
fn session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let first = SessionStore::new(FileStorage::new(&path));
    first
        .set_session(alice(), AccessToken::new("tok"), RefreshToken::new("rtok"))
        .unwrap();
    drop(first);

    let second = SessionStore::new(FileStorage::new(&path));
    assert_eq!(bootstrap(&second), Bootstrap::Restored(alice()));
    assert!(second.is_tenant_admin());
    assert_eq!(second.access_token(), Some(AccessToken::new("tok")));
}

#[test]
fn logout_is_not_restored() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path().join("session.json")));

    let first = SessionStore::with_storage(storage.clone());
    first
        .set_session(alice(), AccessToken::new("tok"), RefreshToken::new("rtok"))
        .unwrap();
    first.clear_session().unwrap();

    let second = SessionStore::with_storage(storage);
    assert_eq!(bootstrap(&second), Bootstrap::Empty);
}

#[test]
fn unreadable_file_is_cleared_on_start() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{ truncated").unwrap();

    let store = SessionStore::new(FileStorage::new(&path));
    assert_eq!(bootstrap(&store), Bootstrap::Corrupted);
    assert!(!store.is_authenticated());
    assert!(!path.exists());
}
