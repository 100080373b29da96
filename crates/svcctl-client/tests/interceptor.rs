//! Failure handling at the head of the request chain.

mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::Harness;
use svcctl_core::error::Error;
use svcctl_core::{ApiUrl, Credentials, NotificationKind, Role, Route};

#[tokio::test]
async fn unauthorized_call_ends_session_and_navigates_once() {
    let h = Harness::start().await;
    h.sign_in(Role::User, "stale");

    Mock::given(method("GET"))
        .and(path("/api/v1/services/7"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid token"})))
        .mount(&h.server)
        .await;

    let err = h.client.services().get("7").await.unwrap_err();

    let Error::Api(api) = err else {
        panic!("expected a normalized error");
    };
    assert_eq!(api.status, 401);
    assert_eq!(api.error, "Your session has expired. Please log in again.");

    assert!(!h.store.is_authenticated());
    assert!(h.storage.snapshot().is_empty());
    assert_eq!(h.navigator.routes(), vec![Route::Login]);
    assert_eq!(
        h.notifier.messages(),
        vec![(
            NotificationKind::Error,
            "Your session has expired. Please log in again.".to_string()
        )]
    );
}

#[tokio::test]
async fn failed_login_is_silent() {
    let h = Harness::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "invalid credentials"})),
        )
        .mount(&h.server)
        .await;

    let err = h
        .client
        .auth()
        .login(&Credentials::new("alice", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(matches!(err, Error::Api(_)));
    assert!(h.notifier.messages().is_empty());
    assert!(!h.store.is_authenticated());
}

#[tokio::test]
async fn conflict_notifies_server_detail() {
    let h = Harness::start().await;
    h.sign_in(Role::User, "tok");

    Mock::given(method("DELETE"))
        .and(path("/api/v1/services/7"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"error": "service is running"})),
        )
        .mount(&h.server)
        .await;

    let err = h.client.services().delete("7").await.unwrap_err();

    assert_eq!(err.to_string(), "service is running");
    assert_eq!(
        h.notifier.messages(),
        vec![(NotificationKind::Error, "service is running".to_string())]
    );
    assert!(h.store.is_authenticated());
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test]
async fn server_errors_use_fixed_message() {
    let h = Harness::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/templates"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
        .mount(&h.server)
        .await;

    let err = h.client.services().templates().await.unwrap_err();
    assert_eq!(err.to_string(), "Internal server error. Please try again later.");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn unreachable_server_reports_status_zero() {
    let server = MockServer::start().await;
    let h = Harness::with_base_url(server, ApiUrl::new("http://127.0.0.1:1/api/v1").unwrap());

    let err = h.client.services().templates().await.unwrap_err();

    assert_eq!(err.status(), Some(0));
    assert_eq!(
        err.to_string(),
        "Unable to connect to the server. Please check your connection."
    );
    assert_eq!(h.notifier.messages().len(), 1);
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let h = Harness::start().await;
    h.sign_in(Role::User, "tok-123");

    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::user_json("user")))
        .expect(1)
        .mount(&h.server)
        .await;

    let me = h.client.profile().me().await.unwrap();
    assert_eq!(me.username, "alice");
}

#[tokio::test]
async fn busy_indicator_covers_mutating_calls() {
    let h = Harness::start().await;
    h.sign_in(Role::User, "tok");

    Mock::given(method("POST"))
        .and(path("/api/v1/services/7/stop"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Service stopped successfully"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&h.server)
        .await;

    let client = h.client.clone();
    let call = tokio::spawn(async move { client.services().stop("7").await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(h.busy.is_busy());

    let ack = call.await.unwrap().unwrap();
    assert_eq!(ack.message, "Service stopped successfully");
    assert!(!h.busy.is_busy());
}

#[tokio::test]
async fn busy_indicator_settles_after_failure() {
    let h = Harness::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/services/7/restart"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;

    let err = h.client.services().restart("7").await.unwrap_err();
    assert_eq!(err.to_string(), "The requested resource was not found.");
    assert_eq!(h.busy.in_flight(), 0);
}

#[tokio::test]
async fn plain_reads_do_not_turn_on_busy() {
    let h = Harness::start().await;
    let busy = h.busy.subscribe();

    Mock::given(method("GET"))
        .and(path("/api/v1/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"templates": [], "total": 0})))
        .mount(&h.server)
        .await;

    h.client.services().templates().await.unwrap();
    assert!(!busy.has_changed());
    assert!(!busy.get());
}
