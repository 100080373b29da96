//! Shared fixtures for the client integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use wiremock::MockServer;

use svcctl_client::ApiClient;
use svcctl_core::{
    AccessToken, ApiUrl, BusyTracker, MemoryStorage, Navigator, NotificationKind, Notifier,
    RefreshToken, Role, Route, SessionStore, User,
};

/// Records every navigation request.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// Records every notification.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotificationKind, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(NotificationKind, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.messages.lock().unwrap().push((kind, message.to_string()));
    }
}

pub struct Harness {
    pub server: MockServer,
    pub store: SessionStore,
    pub storage: Arc<MemoryStorage>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub busy: BusyTracker,
    pub client: ApiClient,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = ApiUrl::new(format!("{}/api/v1", server.uri())).unwrap();
        Self::with_base_url(server, base_url)
    }

    pub fn with_base_url(server: MockServer, base_url: ApiUrl) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::with_storage(storage.clone());
        let navigator = Arc::new(RecordingNavigator::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let busy = BusyTracker::new();

        let client = ApiClient::builder(store.clone())
            .base_url(base_url)
            .navigator(navigator.clone())
            .notifier(notifier.clone())
            .busy(busy.clone())
            .build()
            .unwrap();

        Self {
            server,
            store,
            storage,
            navigator,
            notifier,
            busy,
            client,
        }
    }

    /// Log `role` in directly through the store.
    pub fn sign_in(&self, role: Role, access_token: &str) {
        self.store
            .set_session(
                User::new("u-1", "alice", "alice@example.com", role),
                AccessToken::new(access_token),
                RefreshToken::new("refresh-1"),
            )
            .unwrap();
    }

    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }
}

/// A JWT whose payload carries `exp`.
pub fn jwt(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({"sub": "u-1", "exp": exp}).to_string());
    format!("{}.{}.sig", header, payload)
}

pub fn fresh_jwt() -> String {
    jwt((Utc::now() + Duration::hours(1)).timestamp())
}

pub fn expired_jwt() -> String {
    jwt((Utc::now() - Duration::minutes(5)).timestamp())
}

pub fn user_json(role: &str) -> Value {
    json!({
        "id": "u-1",
        "username": "alice",
        "email": "alice@example.com",
        "first_name": "Alice",
        "last_name": "Liddell",
        "role": role,
        "is_active": true
    })
}

pub fn login_body(token: &str, role: &str) -> Value {
    json!({
        "token": token,
        "refresh_token": "refresh-2",
        "user": user_json(role),
        "expires_at": "2030-01-01T00:00:00Z"
    })
}

pub fn service_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("svc-{}", id),
        "type": "web_server",
        "status": status,
        "description": "",
        "config": {
            "image": "nginx:alpine",
            "ports": [80],
            "environment": {},
            "resources": {"cpu": 250, "memory": 512, "disk": 1024},
            "nomad_job_file": "nginx.nomad"
        },
        "created_by": "u-1"
    })
}
