// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

//! The task-stream server (§10.3): HTTP surface over the store and dispatch
//! coordinator, plus bearer-token auth.

#![forbid(unsafe_code)]

pub mod auth;
pub mod config;
pub mod http;
pub mod state;
pub mod stream;

use std::sync::Arc;

use axum::Router;
use distcalc_store::InMemoryStore;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use auth::JwtSecret;
use config::Config;
use state::AppState;

/// Wires a store, a dispatch coordinator, and the HTTP router together.
/// Returns the router and the coordinator's join handle so callers (real
/// `main`, or a test) can shut it down.
pub fn build(config: &Config) -> (Router, Arc<InMemoryStore>, tokio::task::JoinHandle<()>, CancellationToken) {
    let (changed_tx, changed_rx) = distcalc_store::change_signal();
    let store = Arc::new(InMemoryStore::new(changed_tx));
    let (tasks_tx, tasks_rx) = mpsc::channel(config.queue_capacity);

    let cancel = CancellationToken::new();
    let dispatch_handle =
        distcalc_dispatch::spawn(store.clone(), tasks_tx, config.dispatch_config(), changed_rx, cancel.clone());

    let state = AppState {
        store: store.clone(),
        tasks_rx: Arc::new(Mutex::new(tasks_rx)),
        jwt_secret: JwtSecret(config.jwt_secret.clone()),
    };

    let app = Router::new()
        .merge(http::router())
        .merge(stream::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    (app, store, dispatch_handle, cancel)
}
