#![allow(clippy::unwrap_used)]
// Integration tests for `Controller` using wiremock: the action-then-settle
// protocol, availability decoupling, and credential validation outcomes.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use latchkey_core::{AccountConfig, Controller, LockState, ValidationError};

// ── Helpers ─────────────────────────────────────────────────────────

const SETTLE: Duration = Duration::from_millis(200);

fn config(uri: &str) -> AccountConfig {
    AccountConfig {
        base_url: uri.parse().unwrap(),
        api_token: "test-token".to_string().into(),
        timeout: Duration::from_secs(5),
        // Periodic polling off -- tests drive refreshes explicitly.
        refresh_interval: Duration::ZERO,
        settle_delay: SETTLE,
    }
}

fn lock_body(id: i64, name: &str, state: u8) -> serde_json::Value {
    json!({
        "smartlockId": id,
        "name": name,
        "state": { "state": state, "batteryCritical": false }
    })
}

/// Count collection polls the server has seen so far.
async fn collection_gets(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path() == "/smartlock")
        .count()
}

// ── Connect / snapshot ──────────────────────────────────────────────

#[tokio::test]
async fn connect_loads_initial_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            lock_body(17, "Front Door", 1),
            lock_body(23, "Back Door", 3),
        ])))
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    ctrl.connect().await.unwrap();

    let store = ctrl.store();
    assert!(store.is_available());
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(17).unwrap().state, LockState::Locked);
    assert_eq!(store.get(23).unwrap().state, LockState::Unlocked);
    assert!(store.last_refresh().is_some());
}

#[tokio::test]
async fn reads_are_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([lock_body(17, "Front Door", 1)])),
        )
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    ctrl.refresh().await.unwrap();
    let first = ctrl.store().get(17).unwrap().state;
    ctrl.refresh().await.unwrap();
    let second = ctrl.store().get(17).unwrap().state;

    assert_eq!(first, second);
}

// ── Action-then-settle ──────────────────────────────────────────────

#[tokio::test]
async fn lock_triggers_immediate_and_settle_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([lock_body(17, "Front Door", 3)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/smartlock/17/action/lock"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    ctrl.connect().await.unwrap();
    assert_eq!(collection_gets(&server).await, 1);

    // The immediate refresh is awaited: it has happened by the time the
    // action call returns.
    ctrl.lock(17).await.unwrap();
    assert_eq!(collection_gets(&server).await, 2);

    // The settle refresh only fires after the delay elapses.
    tokio::time::sleep(SETTLE / 4).await;
    assert_eq!(collection_gets(&server).await, 2);
    tokio::time::sleep(SETTLE * 2).await;
    assert_eq!(collection_gets(&server).await, 3);
}

#[tokio::test]
async fn failed_write_schedules_no_settle_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([lock_body(17, "Front Door", 3)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/smartlock/17/action/lock"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    ctrl.connect().await.unwrap();

    let result = ctrl.lock(17).await;
    assert!(result.is_err(), "action should surface the write failure");

    // No immediate refresh, no settle timer.
    tokio::time::sleep(SETTLE * 2).await;
    assert_eq!(collection_gets(&server).await, 1);
}

#[tokio::test]
async fn settle_refresh_observes_final_state() {
    let server = MockServer::start().await;
    // Connect + immediate refresh still see the lock moving...
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([lock_body(17, "Front Door", 4)])),
        )
        .up_to_n_times(2)
        .mount(&server)
        .await;
    // ...and the settle poll sees the terminal state.
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([lock_body(17, "Front Door", 1)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/smartlock/17/action/lock"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    ctrl.connect().await.unwrap();

    ctrl.lock(17).await.unwrap();
    assert_eq!(ctrl.store().get(17).unwrap().state, LockState::Locking);

    tokio::time::sleep(SETTLE * 2).await;
    assert_eq!(ctrl.store().get(17).unwrap().state, LockState::Locked);
}

#[tokio::test]
async fn second_action_mid_settle_does_not_cancel_first_timer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([lock_body(17, "Front Door", 1)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/smartlock/17/action/lock"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    ctrl.connect().await.unwrap();

    // Two actions back to back: both settle timers fire independently.
    ctrl.lock(17).await.unwrap();
    ctrl.lock(17).await.unwrap();
    assert_eq!(collection_gets(&server).await, 3);

    tokio::time::sleep(SETTLE * 2).await;
    assert_eq!(collection_gets(&server).await, 5);
}

#[tokio::test]
async fn concurrent_actions_on_two_devices_settle_independently() {
    let server = MockServer::start().await;
    // First three polls (connect + two immediates) see both in motion.
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            lock_body(17, "Front Door", 4),
            lock_body(23, "Back Door", 2),
        ])))
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            lock_body(17, "Front Door", 1),
            lock_body(23, "Back Door", 3),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/smartlock/17/action/lock"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/smartlock/23/action/unlock"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    ctrl.connect().await.unwrap();

    let (a, b) = tokio::join!(ctrl.lock(17), ctrl.unlock(23));
    a.unwrap();
    b.unwrap();

    tokio::time::sleep(SETTLE * 2).await;
    assert_eq!(collection_gets(&server).await, 5);

    let store = ctrl.store();
    assert_eq!(store.get(17).unwrap().state, LockState::Locked);
    assert_eq!(store.get(23).unwrap().state, LockState::Unlocked);
}

// ── Availability decoupling ─────────────────────────────────────────

#[tokio::test]
async fn failed_poll_marks_unavailable_but_keeps_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([lock_body(17, "Front Door", 1)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    ctrl.connect().await.unwrap();
    assert!(ctrl.store().is_available());

    let result = ctrl.refresh().await;
    assert!(result.is_err());

    let store = ctrl.store();
    assert!(!store.is_available());
    // Stale-but-available: the last successful snapshot stays readable.
    assert_eq!(store.get(17).unwrap().state, LockState::Locked);
}

// ── Periodic polling ────────────────────────────────────────────────

#[tokio::test]
async fn periodic_poll_runs_until_shutdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([lock_body(17, "Front Door", 1)])),
        )
        .mount(&server)
        .await;

    let mut cfg = config(&server.uri());
    cfg.refresh_interval = Duration::from_millis(50);
    let ctrl = Controller::new(cfg).unwrap();
    ctrl.connect().await.unwrap();

    tokio::time::sleep(Duration::from_millis(180)).await;
    let while_running = collection_gets(&server).await;
    assert!(
        while_running >= 3,
        "expected initial + periodic polls, saw {while_running}"
    );

    ctrl.shutdown().await;
    let after_shutdown = collection_gets(&server).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(collection_gets(&server).await, after_shutdown);
}

// ── Credential validation ───────────────────────────────────────────

#[tokio::test]
async fn validation_empty_account_is_distinct_from_bad_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    let result = ctrl.validate_account().await;

    assert!(matches!(result, Err(ValidationError::NoLocksFound)));
}

#[tokio::test]
async fn validation_rejected_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    let result = ctrl.validate_account().await;

    assert!(matches!(result, Err(ValidationError::InvalidCredential)));
}

#[tokio::test]
async fn validation_transport_failure_is_unknown() {
    // Nothing listens here: connection refused, not an HTTP rejection.
    let ctrl = Controller::new(config("http://127.0.0.1:9")).unwrap();
    let result = ctrl.validate_account().await;

    assert!(matches!(result, Err(ValidationError::Unknown(_))));
}

#[tokio::test]
async fn validation_success_reports_device_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartlock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            lock_body(17, "Front Door", 1),
            lock_body(23, "Back Door", 3),
        ])))
        .mount(&server)
        .await;

    let ctrl = Controller::new(config(&server.uri())).unwrap();
    let count = ctrl.validate_account().await.unwrap();

    assert_eq!(count, 2);
}
