// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

//! The worker-facing task stream and result/error callbacks (§5, §10.3).

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use distcalc_errors::StoreError;
use distcalc_proto::{TaskError, TaskResult};
use distcalc_store::GraphStore;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/tasks/stream", get(stream_tasks))
        .route("/v1/tasks/{id}/result", post(submit_result))
        .route("/v1/tasks/{id}/error", post(submit_error))
}

/// Streams newline-delimited JSON tasks to whichever worker connection reads
/// next off the shared channel (§10.3: exact wire format is an
/// implementation choice; the delivery semantics in §5 are what's fixed).
async fn stream_tasks(State(state): State<AppState>) -> Response {
    let rx = state.tasks_rx;
    let body_stream = futures::stream::unfold(rx, |rx| async move {
        let mut guard = rx.lock().await;
        let task = guard.recv().await;
        drop(guard);
        task.map(|t| {
            let mut line = serde_json::to_vec(&t).expect("Task always serializes");
            line.push(b'\n');
            (Ok::<_, std::io::Error>(line), rx.clone())
        })
    });
    Response::builder()
        .header("content-type", "application/x-ndjson")
        .body(Body::from_stream(body_stream))
        .expect("static response parts are always valid")
}

// The submitted `id` duplicates the path segment; callers may send either or
// both consistently, and only the path segment is trusted.
async fn submit_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TaskResult>,
) -> StatusCode {
    match state.store.apply_result(&id, req.value).await {
        Ok(()) => StatusCode::NO_CONTENT,
        // At-least-once delivery means a duplicate or late result is benign, not an error (§5).
        Err(StoreError::NodeNotFound) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::NOT_FOUND,
    }
}

async fn submit_error(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TaskError>,
) -> StatusCode {
    match state.store.apply_error(&id, req.message).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(StoreError::NodeNotFound) | Err(StoreError::ExpressionNotFound) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::NOT_FOUND,
    }
}
