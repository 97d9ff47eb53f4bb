// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use clap::Parser;
use distcalc_server::config::{Cli, Command};

fn init_tracing(log_file: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .unwrap_or_else(|e| panic!("failed to open log file {path}: {e}"));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(move || file.try_clone().expect("log file handle clones"))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(env_filter).init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Command::MintToken { user, ttl_secs }) = cli.command {
        let token = distcalc_server::auth::mint_token(&cli.config.jwt_secret, &user, ttl_secs)?;
        println!("{token}");
        return Ok(());
    }

    init_tracing(cli.config.log_file.as_deref());

    let (app, _store, dispatch_handle, cancel) = distcalc_server::build(&cli.config);

    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel()).expect("failed to install Ctrl+C handler");
    }

    let listener = tokio::net::TcpListener::bind(&cli.config.addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "distcalc-server listening");

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    cancel.cancel();
    dispatch_handle.await?;
    Ok(())
}
