//! End-to-end tests for `POST /webhook`.

use std::sync::Arc;

use serde_json::{json, Value};
use voice_task_relay::persistence::InMemoryCredentialStore;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::test_helpers::{
    memory_payload, mount_created, spawn_app, store_with, tasks_url, test_app_state, test_config,
    TASKS_PATH,
};

async fn post_webhook(base_url: &str, query: &str, body: &Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base_url}/webhook{query}"))
        .json(body)
        .send()
        .await
        .expect("POST /webhook");
    let status = resp.status().as_u16();
    let json = resp.json::<Value>().await.expect("json body");
    (status, json)
}

// ── Happy path ───────────────────────────────────────────────

#[tokio::test]
async fn single_action_item_creates_one_task() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TASKS_PATH))
        .and(header("authorization", "Bearer test_api_key"))
        .and(body_partial_json(json!({"content": "Buy milk", "priority": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "123",
            "content": "Buy milk",
            "url": "https://todoist.com/showTask?id=123"
        })))
        .expect(1)
        .mount(&api)
        .await;

    let state = test_app_state(test_config(&tasks_url(&api)), store_with("test123", "test_api_key"));
    let (base_url, ct) = spawn_app(state).await;

    let payload = memory_payload(json!([{ "description": "Buy milk", "completed": false }]));
    let (status, body) = post_webhook(&base_url, "?uid=test123", &payload).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["tasks_created"], 1);
    assert_eq!(body["tasks"][0]["id"], "123");
    assert_eq!(body["tasks"][0]["content"], "Buy milk");

    ct.cancel();
}

#[tokio::test]
async fn minimal_payload_is_accepted() {
    let api = MockServer::start().await;
    mount_created(&api, json!({"id": "1"})).await;

    let state = test_app_state(test_config(&tasks_url(&api)), store_with("u1", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let payload = json!({
        "structured": { "action_items": [{ "description": "Call mom", "completed": false }] }
    });
    let (status, body) = post_webhook(&base_url, "?uid=u1", &payload).await;

    assert_eq!(status, 200);
    assert_eq!(body["tasks_created"], 1);
    ct.cancel();
}

#[tokio::test]
async fn completed_and_deleted_items_are_skipped() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TASKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x"})))
        .expect(0)
        .mount(&api)
        .await;

    let state = test_app_state(test_config(&tasks_url(&api)), store_with("u1", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let payload = memory_payload(json!([
        { "description": "Already done", "completed": true },
        { "description": "Removed", "completed": false, "deleted": true }
    ]));
    let (status, body) = post_webhook(&base_url, "?uid=u1", &payload).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["tasks_created"], 0);
    assert_eq!(body["tasks"], json!([]));
    ct.cancel();
}

#[tokio::test]
async fn no_action_items_yields_empty_success() {
    let api = MockServer::start().await;
    let state = test_app_state(test_config(&tasks_url(&api)), store_with("u1", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let (status, body) = post_webhook(&base_url, "?uid=u1", &memory_payload(json!([]))).await;

    assert_eq!(status, 200);
    assert_eq!(body["tasks_created"], 0);
    assert!(api.received_requests().await.unwrap_or_default().is_empty());
    ct.cancel();
}

#[tokio::test]
async fn descriptions_are_escaped_before_submission() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TASKS_PATH))
        .and(body_partial_json(json!({"content": "&lt;script&gt;x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "9"})))
        .expect(1)
        .mount(&api)
        .await;

    let state = test_app_state(test_config(&tasks_url(&api)), store_with("u1", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let payload = memory_payload(json!([{ "description": "<script>x", "completed": false }]));
    let (status, body) = post_webhook(&base_url, "?uid=u1", &payload).await;

    assert_eq!(status, 200);
    assert_eq!(body["tasks_created"], 1);
    ct.cancel();
}

#[tokio::test]
async fn long_descriptions_are_capped_at_configured_length() {
    let api = MockServer::start().await;
    mount_created(&api, json!({"id": "1"})).await;

    let mut config = test_config(&tasks_url(&api));
    config.content.max_length = 10;
    let state = test_app_state(config, store_with("u1", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let payload = memory_payload(json!([{ "description": "a".repeat(50), "completed": false }]));
    let (status, _) = post_webhook(&base_url, "?uid=u1", &payload).await;
    assert_eq!(status, 200);

    let requests = api.received_requests().await.expect("recording enabled");
    let sent: Value = requests[0].body_json().expect("json body");
    assert_eq!(sent["content"], "a".repeat(10));
    ct.cancel();
}

// ── Partial failure policy ───────────────────────────────────

#[tokio::test]
async fn failing_item_does_not_abort_the_batch() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TASKS_PATH))
        .and(body_partial_json(json!({"content": "bad item"})))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid content"))
        .expect(1)
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .and(path(TASKS_PATH))
        .and(body_partial_json(json!({"content": "good item"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "2", "content": "good item"})))
        .expect(1)
        .mount(&api)
        .await;

    let state = test_app_state(test_config(&tasks_url(&api)), store_with("u1", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let payload = memory_payload(json!([
        { "description": "bad item", "completed": false },
        { "description": "good item", "completed": false }
    ]));
    let (status, body) = post_webhook(&base_url, "?uid=u1", &payload).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["tasks_created"], 1);
    assert_eq!(body["tasks"][0]["id"], "2");
    ct.cancel();
}

#[tokio::test]
async fn rejected_credential_yields_zero_tasks_not_an_error() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TASKS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(2)
        .mount(&api)
        .await;

    let state = test_app_state(test_config(&tasks_url(&api)), store_with("u1", "revoked"));
    let (base_url, ct) = spawn_app(state).await;

    let payload = memory_payload(json!([
        { "description": "one", "completed": false },
        { "description": "two", "completed": false }
    ]));
    let (status, body) = post_webhook(&base_url, "?uid=u1", &payload).await;

    assert_eq!(status, 200);
    assert_eq!(body["tasks_created"], 0);
    ct.cancel();
}

// ── Client errors ────────────────────────────────────────────

#[tokio::test]
async fn missing_uid_is_bad_request() {
    let api = MockServer::start().await;
    let state = test_app_state(test_config(&tasks_url(&api)), Arc::new(InMemoryCredentialStore::new()));
    let (base_url, ct) = spawn_app(state).await;

    let (status, body) = post_webhook(&base_url, "", &json!({})).await;

    assert_eq!(status, 400);
    assert!(body["detail"].as_str().expect("detail").contains("Missing user ID"));
    ct.cancel();
}

#[tokio::test]
async fn empty_uid_is_bad_request() {
    let api = MockServer::start().await;
    let state = test_app_state(test_config(&tasks_url(&api)), Arc::new(InMemoryCredentialStore::new()));
    let (base_url, ct) = spawn_app(state).await;

    let (status, body) = post_webhook(&base_url, "?uid=", &json!({})).await;

    assert_eq!(status, 400);
    assert!(body["detail"].as_str().expect("detail").contains("Missing user ID"));
    ct.cancel();
}

#[tokio::test]
async fn unknown_user_is_directed_to_setup() {
    let api = MockServer::start().await;
    let state = test_app_state(test_config(&tasks_url(&api)), store_with("someone-else", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let payload = memory_payload(json!([{ "description": "Buy milk", "completed": false }]));
    let (status, body) = post_webhook(&base_url, "?uid=stranger", &payload).await;

    assert_eq!(status, 400);
    let detail = body["detail"].as_str().expect("detail");
    assert!(detail.contains("not configured"), "{detail}");
    assert!(detail.contains("/setup"), "{detail}");
    assert!(api.received_requests().await.unwrap_or_default().is_empty());
    ct.cancel();
}

#[tokio::test]
async fn setup_link_encodes_the_user_id() {
    let api = MockServer::start().await;
    let state = test_app_state(test_config(&tasks_url(&api)), store_with("someone-else", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let (status, body) = post_webhook(&base_url, "?uid=a%20b%26c", &json!({})).await;

    assert_eq!(status, 400);
    let detail = body["detail"].as_str().expect("detail");
    assert!(detail.ends_with("/setup?uid=a%20b%26c"), "{detail}");
    ct.cancel();
}

#[tokio::test]
async fn padded_uid_matches_trimmed_credential() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TASKS_PATH))
        .and(header("authorization", "Bearer key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "7"})))
        .expect(1)
        .mount(&api)
        .await;
    let state = test_app_state(test_config(&tasks_url(&api)), store_with("u1", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let payload = memory_payload(json!([{ "description": "Buy milk", "completed": false }]));
    let (status, body) = post_webhook(&base_url, "?uid=%20u1%20", &payload).await;

    assert_eq!(status, 200, "{body}");
    assert_eq!(body["tasks_created"], 1);
    ct.cancel();
}

#[tokio::test]
async fn timestamps_without_offset_are_accepted() {
    let api = MockServer::start().await;
    mount_created(&api, json!({"id": "1", "content": "Buy milk"})).await;
    let state = test_app_state(test_config(&tasks_url(&api)), store_with("u1", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let mut payload = memory_payload(json!([{ "description": "Buy milk", "completed": false }]));
    payload["created_at"] = json!("2024-03-14T12:00:00.123456");
    payload["started_at"] = json!("2024-03-14 11:58:00");
    payload["finished_at"] = json!("not a timestamp");
    let (status, body) = post_webhook(&base_url, "?uid=u1", &payload).await;

    assert_eq!(status, 200, "{body}");
    assert_eq!(body["tasks_created"], 1);
    ct.cancel();
}

#[tokio::test]
async fn malformed_payload_reports_parse_error() {
    let api = MockServer::start().await;
    let state = test_app_state(test_config(&tasks_url(&api)), store_with("u1", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let payload = json!({ "structured": { "action_items": [{ "description": 42 }] } });
    let (status, body) = post_webhook(&base_url, "?uid=u1", &payload).await;

    assert_eq!(status, 400);
    assert!(body["detail"]
        .as_str()
        .expect("detail")
        .starts_with("invalid memory payload"));
    ct.cancel();
}

#[tokio::test]
async fn non_json_body_is_bad_request() {
    let api = MockServer::start().await;
    let state = test_app_state(test_config(&tasks_url(&api)), store_with("u1", "key"));
    let (base_url, ct) = spawn_app(state).await;

    let resp = reqwest::Client::new()
        .post(format!("{base_url}/webhook?uid=u1"))
        .body("not json")
        .send()
        .await
        .expect("POST /webhook");

    assert_eq!(resp.status().as_u16(), 400);
    ct.cancel();
}
