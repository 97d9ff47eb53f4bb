// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

//! Fetches tasks from the server's ndjson stream and reports them back.
//! Each of `concurrency` fibers runs its own connection independently, so one
//! dropped connection doesn't stall the others (§5).

use std::time::Duration;

use distcalc_proto::{TaskError, TaskResult};
use futures::StreamExt;
use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::compute::compute;
use crate::config::Config;

/// Bounds connection setup and any single non-streaming request (the
/// result/error callbacks); the long-lived stream GET itself has no total
/// timeout and is instead bounded by racing every `.await` against `cancel`.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Spawns `config.concurrency` fibers, each running its own stream-and-retry
/// loop, and waits for all of them to stop.
pub async fn run_multiple(config: Config, cancel: CancellationToken) {
    let mut handles = Vec::with_capacity(config.concurrency);
    for worker_id in 0..config.concurrency {
        let config = config.clone();
        let cancel = cancel.clone();
        handles.push(tokio::spawn(run_one(worker_id, config, cancel)));
    }
    for handle in handles {
        let _ = handle.await;
    }
}

async fn run_one(worker_id: usize, config: Config, cancel: CancellationToken) {
    let client = reqwest::Client::builder()
        .connect_timeout(REQUEST_TIMEOUT)
        .build()
        .expect("static client config is always valid");
    let mut retries_left = config.max_retries;

    loop {
        if cancel.is_cancelled() {
            return;
        }

        match stream_and_process(worker_id, &client, &config, &cancel).await {
            Ok(()) => return,
            Err(err) => {
                tracing::warn!(worker_id, %err, "task stream dropped");
                if retries_left == 0 {
                    tracing::error!(worker_id, "retry budget exhausted, stopping this fiber");
                    return;
                }
                retries_left -= 1;
                // A little jitter keeps a fleet reconnecting after a server
                // restart from all hammering it in lockstep.
                let jitter_ms = rand::thread_rng().gen_range(0..500);
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(Duration::from_millis(1000 + jitter_ms)) => {}
                }
            }
        }
    }
}

async fn stream_and_process(
    worker_id: usize,
    client: &reqwest::Client,
    config: &Config,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let response = tokio::select! {
        _ = cancel.cancelled() => return Ok(()),
        res = client.get(format!("{}/v1/tasks/stream", config.addr)).send() => res?.error_for_status()?,
    };

    let mut bytes_stream = response.bytes_stream();
    let mut buf: Vec<u8> = Vec::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            chunk = bytes_stream.next() => {
                match chunk {
                    None => return Err(anyhow::anyhow!("task stream ended")),
                    Some(Err(err)) => return Err(err.into()),
                    Some(Ok(bytes)) => {
                        buf.extend_from_slice(&bytes);
                        while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                            let line: Vec<u8> = buf.drain(..=pos).collect();
                            let line = &line[..line.len().saturating_sub(1)];
                            if line.is_empty() {
                                continue;
                            }
                            let task: distcalc_proto::Task = serde_json::from_slice(line)?;
                            handle_task(worker_id, client, config, task, cancel).await;
                        }
                    }
                }
            }
        }
    }
}

async fn handle_task(
    worker_id: usize,
    client: &reqwest::Client,
    config: &Config,
    task: distcalc_proto::Task,
    cancel: &CancellationToken,
) {
    tracing::debug!(worker_id, task_id = %task.id, op = %task.op, "computing task");
    let computed = match compute(&task, cancel).await {
        Some(result) => result,
        None => {
            tracing::debug!(worker_id, task_id = %task.id, "cancelled mid-compute, skipping report");
            return;
        }
    };

    match computed {
        Ok(value) => {
            let url = format!("{}/v1/tasks/{}/result", config.addr, task.id);
            let body = TaskResult { id: task.id.clone(), value };
            let send = client.post(url).timeout(REQUEST_TIMEOUT).json(&body).send();
            tokio::select! {
                _ = cancel.cancelled() => {}
                res = send => if let Err(err) = res {
                    tracing::warn!(worker_id, task_id = %task.id, %err, "failed to report result");
                },
            }
        }
        Err(err) => {
            let url = format!("{}/v1/tasks/{}/error", config.addr, task.id);
            let body = TaskError { id: task.id.clone(), message: err.to_string() };
            let send = client.post(url).timeout(REQUEST_TIMEOUT).json(&body).send();
            tokio::select! {
                _ = cancel.cancelled() => {}
                res = send => if let Err(send_err) = res {
                    tracing::warn!(worker_id, task_id = %task.id, err = %send_err, "failed to report error");
                },
            }
        }
    }
}
