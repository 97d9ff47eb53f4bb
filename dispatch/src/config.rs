// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use std::time::Duration;

use distcalc_proto::Op;

/// Per-operator artificial compute latency, attached to each dispatched task
/// so a worker can simulate realistic work (§5, §10.5
/// `TIME_ADDITION_MS`/etc.).
#[derive(Debug, Clone, Copy)]
pub struct OpLatencies {
    pub add_ms: i32,
    pub sub_ms: i32,
    pub mul_ms: i32,
    pub div_ms: i32,
}

impl OpLatencies {
    pub fn for_op(&self, op: Op) -> i32 {
        match op {
            Op::Add => self.add_ms,
            Op::Sub => self.sub_ms,
            Op::Mul => self.mul_ms,
            Op::Div => self.div_ms,
        }
    }
}

impl Default for OpLatencies {
    fn default() -> Self {
        Self { add_ms: 1000, sub_ms: 1000, mul_ms: 2000, div_ms: 2000 }
    }
}

/// Dispatch coordinator tuning (§5, §10.5).
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Bound on the outstanding-task channel; a full channel applies
    /// backpressure to the scan loop rather than growing unbounded.
    pub queue_capacity: usize,
    /// A dispatched node not resulted-or-errored within this long is
    /// considered lost and becomes eligible for redispatch.
    pub retry_interval: Duration,
    /// Upper bound on how long a graph-changed signal can go unobserved;
    /// this is the fallback that catches lease expiry with no new writes.
    pub scan_interval: Duration,
    pub latencies: OpLatencies,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            retry_interval: Duration::from_secs(30),
            scan_interval: Duration::from_secs(5),
            latencies: OpLatencies::default(),
        }
    }
}
