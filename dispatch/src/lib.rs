// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

//! The dispatch coordinator (§5): turns fit nodes from the store into a
//! bounded stream of wire tasks for workers to pull.

#![forbid(unsafe_code)]

mod config;
mod coordinator;

pub use config::{DispatchConfig, OpLatencies};
pub use coordinator::{run, spawn};

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use distcalc_parser::{parse, Node};
    use distcalc_store::{change_signal, GraphStore, InMemoryStore};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use super::*;

    #[tokio::test]
    async fn fit_node_is_pushed_through_to_the_task_channel_with_latency_attached() {
        let (changed_tx, changed_rx) = change_signal();
        let store = Arc::new(InMemoryStore::new(changed_tx));
        let (tasks_tx, mut tasks_rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();

        let config = DispatchConfig { scan_interval: Duration::from_millis(20), ..Default::default() };
        let handle = spawn(store.clone(), tasks_tx, config.clone(), changed_rx, cancel.clone());

        let ast: Node = parse("2+2").unwrap();
        store.create("u1".into(), "2+2".into(), &ast).await.unwrap();

        let task = tasks_rx.recv().await.expect("a task should arrive");
        assert_eq!((task.arg1, task.arg2), (2.0, 2.0));
        assert_eq!(task.op_latency_ms, config.latencies.add_ms);

        cancel.cancel();
        handle.await.unwrap();
    }
}
