//! Command-line client for the organization admin API.

#![forbid(unsafe_code)]

mod cli_config;
mod commands;
mod mcp;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use orgadmin_application::{AdminResourceFetcher, AdminService, RequestExecutor};
use orgadmin_core::ClientResult;
use orgadmin_infrastructure::ReqwestTransport;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli_config::CliConfig;
use crate::commands::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let command = Cli::parse().command;
    let operation = command.operation();
    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(run_error) => {
            error!(operation, error = %run_error, "command failed");
            eprintln!("{}", run_error.context(operation));
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> ClientResult<()> {
    let config = CliConfig::load()?;
    let transport = ReqwestTransport::new(&config.base_url, config.timeout)?;
    let executor = RequestExecutor::new(Arc::new(transport), Some(config.api_key.clone()));
    let admin = AdminService::new(executor);
    let fetcher = AdminResourceFetcher::new(admin.clone());

    info!(
        base_url = %config.base_url,
        operation = command.operation(),
        "orgadmin started"
    );

    if command == Command::Mcp {
        return mcp::serve(Arc::new(fetcher), config.poll_interval).await;
    }

    let mut stdout = std::io::stdout();
    commands::run(command, &admin, &fetcher, &mut stdout).await
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
