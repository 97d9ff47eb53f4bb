// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use distcalc_proto::Task;
use distcalc_store::InMemoryStore;
use tokio::sync::{mpsc, Mutex};

use crate::auth::JwtSecret;

/// Shared application state handed to every axum handler.
///
/// `tasks_rx` is wrapped in an async mutex rather than owned by a single
/// handler because more than one worker's stream connection reads from it
/// concurrently; each reader only holds the lock for the instant it takes to
/// pull the next task, so tasks are handed out first-come, first-served
/// across however many streams are open (§5, §10.3).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub tasks_rx: Arc<Mutex<mpsc::Receiver<Task>>>,
    pub jwt_secret: JwtSecret,
}
