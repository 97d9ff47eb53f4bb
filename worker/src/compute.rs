// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use std::time::Duration;

use distcalc_errors::ComputeError;
use distcalc_proto::{Op, Task};
use tokio_util::sync::CancellationToken;

/// Performs one task's arithmetic, then sleeps for its configured latency
/// before returning — win or lose. A worker that fails fast on division by
/// zero still occupies its slot for the operator's nominal duration, just
/// like a real one would.
///
/// The sleep races cancellation: if `cancel` fires first, this returns
/// `None` immediately and the caller must not report any result.
pub async fn compute(task: &Task, cancel: &CancellationToken) -> Option<Result<f64, ComputeError>> {
    let result = match task.op {
        Op::Add => Ok(task.arg1 + task.arg2),
        Op::Sub => Ok(task.arg1 - task.arg2),
        Op::Mul => Ok(task.arg1 * task.arg2),
        Op::Div if task.arg2 == 0.0 => Err(ComputeError::DivisionByZero),
        Op::Div => Ok(task.arg1 / task.arg2),
    };

    let latency_ms = task.op_latency_ms.max(0) as u64;
    tokio::select! {
        _ = cancel.cancelled() => return None,
        _ = tokio::time::sleep(Duration::from_millis(latency_ms)) => {}
    }

    Some(result)
}

#[cfg(test)]
mod test {
    use super::*;

    fn task(arg1: f64, op: Op, arg2: f64) -> Task {
        Task { id: "t1".into(), arg1, arg2, op, op_latency_ms: 0 }
    }

    #[tokio::test]
    async fn computes_each_operator() {
        let cancel = CancellationToken::new();
        assert_eq!(compute(&task(2.0, Op::Add, 3.0), &cancel).await, Some(Ok(5.0)));
        assert_eq!(compute(&task(2.0, Op::Sub, 3.0), &cancel).await, Some(Ok(-1.0)));
        assert_eq!(compute(&task(2.0, Op::Mul, 3.0), &cancel).await, Some(Ok(6.0)));
        assert_eq!(compute(&task(6.0, Op::Div, 3.0), &cancel).await, Some(Ok(2.0)));
    }

    #[tokio::test]
    async fn division_by_zero_is_a_compute_error() {
        let cancel = CancellationToken::new();
        assert_eq!(compute(&task(1.0, Op::Div, 0.0), &cancel).await, Some(Err(ComputeError::DivisionByZero)));
    }

    #[tokio::test]
    async fn cancellation_aborts_the_latency_sleep() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut slow = task(2.0, Op::Add, 3.0);
        slow.op_latency_ms = 60_000;
        assert_eq!(compute(&slow, &cancel).await, None);
    }
}
