// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use clap::{Parser, Subcommand};
use distcalc_dispatch::{DispatchConfig, OpLatencies};

/// Every field binds to an env var so the server runs unattended from
/// environment alone (§10.5); CLI flags are there for local overrides.
#[derive(Debug, Clone, Parser)]
#[command(name = "distcalc-server", version, about = "Distributed expression evaluator coordinator")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mints a bearer token for exercising the API locally. Real deployments
    /// mint tokens elsewhere; this exists only so the server is usable
    /// standalone (§10.3, §1 Non-goals: authentication issuance is external).
    MintToken {
        #[arg(long)]
        user: String,
        #[arg(long, default_value_t = 3600)]
        ttl_secs: i64,
    },
}

#[derive(Debug, Clone, Parser)]
pub struct Config {
    #[arg(long, env = "DISTCALC_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: String,

    #[arg(long, env = "DISTCALC_JWT_SECRET")]
    pub jwt_secret: String,

    #[arg(long, env = "DISTCALC_RETRY_INTERVAL_MS", default_value_t = 60_000)]
    pub retry_interval_ms: u64,

    #[arg(long, env = "DISTCALC_TASK_CAPACITY", default_value_t = 64)]
    pub queue_capacity: usize,

    #[arg(long, env = "DISTCALC_ADDITION_MS", default_value_t = 10)]
    pub addition_ms: i32,

    #[arg(long, env = "DISTCALC_SUBTRACTION_MS", default_value_t = 10)]
    pub subtraction_ms: i32,

    #[arg(long, env = "DISTCALC_MULTIPLICATION_MS", default_value_t = 10)]
    pub multiplication_ms: i32,

    #[arg(long, env = "DISTCALC_DIVISION_MS", default_value_t = 10)]
    pub division_ms: i32,

    /// If set, logs are appended to this file instead of stdout.
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<String>,
}

impl Config {
    pub fn dispatch_config(&self) -> DispatchConfig {
        let retry_interval = std::time::Duration::from_millis(self.retry_interval_ms);
        DispatchConfig {
            queue_capacity: self.queue_capacity,
            retry_interval,
            // Rescans at least twice per lease window so an expired lease
            // doesn't sit idle for a full extra interval.
            scan_interval: retry_interval / 2,
            latencies: OpLatencies {
                add_ms: self.addition_ms,
                sub_ms: self.subtraction_ms,
                mul_ms: self.multiplication_ms,
                div_ms: self.division_ms,
            },
        }
    }
}
