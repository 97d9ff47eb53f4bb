// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use std::time::Instant;

use chrono::{DateTime, Utc};
use distcalc_proto::Op;

pub type NodeId = String;
pub type ExpressionId = String;
pub type UserId = String;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A single node of a persisted expression tree (§3, §6).
///
/// `Number` nodes are leaves. `Operation` nodes are internal; once both of
/// their children are `Number`s they become eligible for dispatch, and
/// `dispatched_at` records the last time a task for them was handed out so a
/// lease that never comes back can be retried (§5).
#[derive(Debug, Clone)]
pub enum StoredNode {
    Number(f64),
    Operation { op: Op, left: NodeId, right: NodeId, dispatched_at: Option<Instant> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionStatus {
    Pending,
    Finished,
    Error,
}

/// The top-level record a client polls (§3 Expression, §6).
#[derive(Debug, Clone)]
pub struct Expression {
    pub id: ExpressionId,
    pub user_id: UserId,
    pub origin: String,
    pub status: ExpressionStatus,
    pub result: Option<f64>,
    pub error: Option<String>,
    pub root_node_id: Option<NodeId>,
    pub created_at: DateTime<Utc>,
}

/// A node ready to compute: both operands are known numbers (§6 GetFitNodes).
#[derive(Debug, Clone)]
pub struct FitTask {
    pub node_id: NodeId,
    pub arg1: f64,
    pub arg2: f64,
    pub op: Op,
}
