// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use distcalc_server::auth::mint_token;
use distcalc_server::config::Config;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        addr: "0.0.0.0:0".to_string(),
        jwt_secret: "test-secret".to_string(),
        retry_interval_ms: 30_000,
        queue_capacity: 64,
        addition_ms: 0,
        subtraction_ms: 0,
        multiplication_ms: 0,
        division_ms: 0,
        log_file: None,
    }
}

fn token() -> String {
    mint_token("test-secret", "alice", 3600).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_bearer_token_is_rejected() {
    let (app, _store, _handle, cancel) = distcalc_server::build(&test_config());
    let response = app
        .oneshot(Request::builder().uri("/v1/expressions").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    cancel.cancel();
}

#[tokio::test]
async fn bare_number_expression_finishes_immediately() {
    let (app, _store, _handle, cancel) = distcalc_server::build(&test_config());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/expressions")
                .header("authorization", format!("Bearer {}", token()))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "expression": "1" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["status"], "finished");
    assert_eq!(created["result"], 1.0);
    cancel.cancel();
}

#[tokio::test]
async fn pending_expression_becomes_finished_once_the_dispatch_loop_applies_a_result() {
    let (app, store, _handle, cancel) = distcalc_server::build(&test_config());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/expressions")
                .header("authorization", format!("Bearer {}", token()))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "expression": "2+2" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let created = body_json(response).await;
    assert_eq!(created["status"], "pending");
    let id = created["id"].as_str().unwrap().to_string();

    // Give the dispatch coordinator a moment to fit the single addition node,
    // then resolve it directly against the store, as a worker would via the
    // result callback endpoint.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fit = distcalc_store::GraphStore::fit_nodes(&*store, Duration::from_secs(30)).await;
    assert_eq!(fit.len(), 1);
    distcalc_store::GraphStore::apply_result(&*store, &fit[0].node_id, 4.0).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/v1/expressions/{id}"))
                .header("authorization", format!("Bearer {}", token()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let view = body_json(response).await;
    assert_eq!(view["status"], "finished");
    assert_eq!(view["result"], 4.0);
    cancel.cancel();
}

#[tokio::test]
async fn an_unparseable_expression_is_rejected_with_422() {
    let (app, _store, _handle, cancel) = distcalc_server::build(&test_config());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/expressions")
                .header("authorization", format!("Bearer {}", token()))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "expression": "1+" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    cancel.cancel();
}

#[tokio::test]
async fn a_user_cannot_read_another_users_expression() {
    let (app, _store, _handle, cancel) = distcalc_server::build(&test_config());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/expressions")
                .header("authorization", format!("Bearer {}", token()))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "expression": "1" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let other_token = mint_token("test-secret", "bob", 3600).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/v1/expressions/{id}"))
                .header("authorization", format!("Bearer {other_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    cancel.cancel();
}
