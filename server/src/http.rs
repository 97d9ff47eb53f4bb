// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

//! The expression CRUD surface (§6, §10.3).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use distcalc_errors::{ParseError, StoreError};
use distcalc_store::{Expression, ExpressionStatus, GraphStore};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/expressions", post(create).get(list))
        .route("/v1/expressions/{id}", get(get_one).delete(delete_one))
        .route("/healthz", get(healthz))
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Deserialize)]
struct CreateRequest {
    expression: String,
}

#[derive(Serialize)]
struct ExpressionView {
    id: String,
    expression: String,
    status: &'static str,
    result: Option<f64>,
    error: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Expression> for ExpressionView {
    fn from(e: Expression) -> Self {
        let status = match e.status {
            ExpressionStatus::Pending => "pending",
            ExpressionStatus::Finished => "finished",
            ExpressionStatus::Error => "error",
        };
        ExpressionView { id: e.id, expression: e.origin, status, result: e.result, error: e.error, created_at: e.created_at }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Parse(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "expression not found").into_response(),
        }
    }
}

enum ApiError {
    Parse(ParseError),
    NotFound,
}

impl From<ParseError> for ApiError {
    fn from(e: ParseError) -> Self {
        ApiError::Parse(e)
    }
}

async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateRequest>,
) -> Result<Json<ExpressionView>, ApiError> {
    let ast = distcalc_parser::parse(&req.expression)?;
    let id = state.store.create(user_id, req.expression, &ast).await.expect("fresh expression id is always valid");
    let expr = state.store.get(&id).await.expect("just created");
    Ok(Json(expr.into()))
}

async fn list(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> Json<Vec<ExpressionView>> {
    let mut views: Vec<ExpressionView> = state.store.get_by_user(&user_id).await.into_iter().map(Into::into).collect();
    views.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Json(views)
}

async fn get_one(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ExpressionView>, ApiError> {
    let expr = state.store.get(&id).await.filter(|e| e.user_id == user_id).ok_or(ApiError::NotFound)?;
    Ok(Json(expr.into()))
}

async fn delete_one(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.store.get(&id).await {
        Some(expr) if expr.user_id == user_id => {}
        _ => return Err(ApiError::NotFound),
    }
    match state.store.delete(&id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::ExpressionNotFound) => Err(ApiError::NotFound),
        Err(_) => Err(ApiError::NotFound),
    }
}
