// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use distcalc_proto::Task as WireTask;
use distcalc_store::GraphStore;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::DispatchConfig;

/// Scans the store for fit nodes and feeds them into a bounded task queue
/// that the task-stream server drains (§5).
///
/// The scan is woken by two things: a graph-changed signal (a `Create` or
/// `ApplyResult`/`ApplyError` just happened) and a fallback tick, since a
/// dispatched node expiring its lease produces no signal of its own.
pub async fn run<S>(
    store: Arc<S>,
    tasks_tx: mpsc::Sender<WireTask>,
    config: DispatchConfig,
    mut changed: mpsc::Receiver<()>,
    cancel: CancellationToken,
) where
    S: GraphStore,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("dispatch coordinator shutting down");
                return;
            }
            signalled = changed.recv() => {
                if signalled.is_none() {
                    tracing::info!("graph-changed channel closed, stopping dispatch coordinator");
                    return;
                }
            }
            _ = tokio::time::sleep(config.scan_interval) => {}
        }

        let fit = store.fit_nodes(config.retry_interval).await;
        for task in fit {
            let op_latency_ms = config.latencies.for_op(task.op);
            let wire =
                WireTask { id: task.node_id, arg1: task.arg1, arg2: task.arg2, op: task.op, op_latency_ms };

            tokio::select! {
                _ = cancel.cancelled() => return,
                sent = tasks_tx.send(wire) => {
                    if sent.is_err() {
                        tracing::warn!("task stream receiver dropped, stopping dispatch coordinator");
                        return;
                    }
                }
            }
        }
    }
}

/// Spawns [`run`] as a background task.
pub fn spawn<S>(
    store: Arc<S>,
    tasks_tx: mpsc::Sender<WireTask>,
    config: DispatchConfig,
    changed: mpsc::Receiver<()>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()>
where
    S: GraphStore + Send + Sync + 'static,
{
    tokio::spawn(run(store, tasks_tx, config, changed, cancel))
}
