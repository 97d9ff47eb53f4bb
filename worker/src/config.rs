// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use clap::Parser;

/// Every field binds to an env var so a fleet of workers runs unattended
/// from environment alone (§10.5, §10.7).
#[derive(Debug, Clone, Parser)]
#[command(name = "distcalc-worker", version, about = "Distributed expression evaluator worker")]
pub struct Config {
    #[arg(long, env = "DISTCALC_ADDR", default_value = "http://127.0.0.1:8080")]
    pub addr: String,

    /// Number of concurrent stream connections this process keeps open.
    #[arg(long, env = "DISTCALC_COMPUTING_POWER", default_value_t = 4)]
    pub concurrency: usize,

    /// How many times a dropped stream is retried before a fiber gives up.
    #[arg(long, env = "DISTCALC_RETRY_COUNT", default_value_t = 3)]
    pub max_retries: u32,
}
