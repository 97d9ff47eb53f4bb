// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

//! Wire types for the dispatch plane (§6): the task a worker is handed, and
//! the two ways a worker reports back. Framing is newline-delimited JSON
//! over HTTP (see the server crate); these types only fix the payload shape.

#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// A binary arithmetic operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        })
    }
}

/// A single binary operation dispatched to a worker.
///
/// `id` is the store's node id, opaque to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub arg1: f64,
    pub arg2: f64,
    pub op: Op,
    pub op_latency_ms: i32,
}

/// A worker's successful result for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub id: String,
    pub value: f64,
}

/// A worker's failure report for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskError {
    pub id: String,
    pub message: String,
}
