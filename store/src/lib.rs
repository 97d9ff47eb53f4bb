// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

//! The task graph store (§6): persists expression trees, answers which
//! operation nodes are ready to compute, and applies worker results back
//! into the tree.

#![forbid(unsafe_code)]

mod memory;
mod model;

pub use memory::{GraphStore, InMemoryStore};
pub use model::{new_id, Expression, ExpressionId, ExpressionStatus, FitTask, NodeId, StoredNode, UserId};

/// Capacity of 1: a pending signal already means "scan again", so further
/// sends while one is outstanding are redundant (§5 dispatch coordinator).
pub fn change_signal() -> (tokio::sync::mpsc::Sender<()>, tokio::sync::mpsc::Receiver<()>) {
    tokio::sync::mpsc::channel(1)
}
