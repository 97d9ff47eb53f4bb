// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

//! The remote worker (§5): pulls fit tasks from the server and reports
//! their results back.

#![forbid(unsafe_code)]

pub mod client;
pub mod compute;
pub mod config;

pub use client::run_multiple;
pub use config::Config;
