/// Integration tests for `/api/chat`
///
/// The agent is replaced by a stub runner so each test controls the relay
/// outcome and can inspect the exact argv it received.
use axum::http::StatusCode;
use maruadmin::history::Role;
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

mod common;
use common::{body_json, delete, get, post_json, test_state, StubRunner};

#[tokio::test]
async fn test_chat_turn_returns_stripped_reply_and_records_both_sides() {
    let runner = StubRunner::ok("\n🦞 hi there\n");
    let (state, _tmp) = test_state(runner.clone());
    let app = maruadmin::api::build_router(state.clone());

    let response = app
        .oneshot(post_json("/api/chat", json!({ "message": "hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "response": "hi there" }));

    let rows = state.history.recent(10).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].role, Role::Assistant);
    assert_eq!(rows[0].content, "hi there");
    assert_eq!(rows[1].role, Role::User);
    assert_eq!(rows[1].content, "hello");

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec!["agent", "-m", "hello"]);
}

#[tokio::test]
async fn test_chat_relay_failure_keeps_user_row_only() {
    let runner = StubRunner::failing(1, "Error: no API key configured");
    let (state, _tmp) = test_state(runner);
    let app = maruadmin::api::build_router(state.clone());

    let response = app
        .oneshot(post_json("/api/chat", json!({ "message": "hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("no API key configured"));

    let rows = state.history.recent(10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].role, Role::User);
}

#[tokio::test]
async fn test_chat_rejects_missing_or_empty_message() {
    let runner = StubRunner::ok("🦞 unused");
    let (state, _tmp) = test_state(runner.clone());
    let app = maruadmin::api::build_router(state.clone());

    let response = app
        .clone()
        .oneshot(post_json("/api/chat", json!({ "text": "hello" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());

    let response = app
        .oneshot(post_json("/api/chat", json!({ "message": "   " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(runner.calls().is_empty());
    assert!(state.history.recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_history_is_oldest_first_and_limited() {
    let (state, _tmp) = test_state(StubRunner::ok(""));
    for i in 0..5 {
        state
            .history
            .append(Role::User, &format!("message {}", i))
            .unwrap();
    }
    let app = maruadmin::api::build_router(state);

    let response = app.clone().oneshot(get("/api/chat")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let all = body_json(response).await;
    let contents: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(
        contents,
        vec!["message 0", "message 1", "message 2", "message 3", "message 4"]
    );
    assert_eq!(all[0]["role"], "user");
    assert!(all[0]["id"].is_i64());
    assert!(all[0]["timestamp"].is_string());

    let response = app.oneshot(get("/api/chat?limit=2")).await.unwrap();
    let recent = body_json(response).await;
    let contents: Vec<&str> = recent
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["message 3", "message 4"]);
}

#[tokio::test]
async fn test_chat_history_rejects_bad_limit() {
    let (state, _tmp) = test_state(StubRunner::ok(""));
    let app = maruadmin::api::build_router(state);
    let response = app.oneshot(get("/api/chat?limit=lots")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_clear_is_idempotent() {
    let (state, _tmp) = test_state(StubRunner::ok(""));
    state.history.append(Role::User, "a").unwrap();
    state.history.append(Role::Assistant, "b").unwrap();
    let app = maruadmin::api::build_router(state.clone());

    let response = app.clone().oneshot(delete("/api/chat")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "deleted": 2 })
    );

    let response = app.oneshot(delete("/api/chat")).await.unwrap();
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "deleted": 0 })
    );
    assert!(state.history.recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn test_closed_store_is_service_unavailable() {
    let (state, _tmp) = test_state(StubRunner::ok("🦞 hi"));
    state.history.close().unwrap();
    let app = maruadmin::api::build_router(state);

    let response = app.clone().oneshot(get("/api/chat")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .oneshot(post_json("/api/chat", json!({ "message": "hello" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
