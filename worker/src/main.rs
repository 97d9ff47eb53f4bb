// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use clap::Parser;
use distcalc_worker::{run_multiple, Config};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::parse();
    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel()).expect("failed to install Ctrl+C handler");
    }

    tracing::info!(addr = %config.addr, concurrency = config.concurrency, "distcalc-worker starting");
    run_multiple(config, cancel).await;
    Ok(())
}
