// ABOUTME: Stdio MCP server binary launched by agent hosts as a subprocess
// ABOUTME: Loads .env and configuration, initializes stderr logging, and serves JSON-RPC on stdio
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Airbyte MCP Server Binary
//!
//! Configuration problems abort startup before any network call. After that,
//! tool failures are reported to the agent and the process keeps serving.

use airbyte_mcp_server::{
    config::environment::{load_dotenv, ServerConfig},
    logging::{LogFormat, LoggingConfig},
    mcp::{resources::ServerResources, transport_manager::StdioTransport},
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "airbyte-mcp-server")]
#[command(version)]
#[command(about = "MCP server reporting Airbyte connection sync status over stdio")]
pub struct Args {
    /// Log filter directive, overrides `RUST_LOG` (e.g. `debug`)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format, overrides `LOG_FORMAT`
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Dotenv file to load instead of `.env` in the working directory
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load before logging so `.env` may set RUST_LOG / LOG_FORMAT
    let dotenv_loaded = load_dotenv(args.env_file.as_deref())?;

    let mut logging_config = LoggingConfig::from_env();
    if let Some(level) = args.log_level {
        logging_config = logging_config.with_level(level);
    }
    if let Some(format) = args.log_format {
        logging_config = logging_config.with_format(format);
    }
    logging_config.init()?;

    if dotenv_loaded {
        debug!("Loaded environment from dotenv file");
    }

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {e}");
            return Err(e).context("invalid Airbyte MCP server configuration");
        }
    };
    info!("{}", config.summary());

    let resources = Arc::new(
        ServerResources::new(config).context("failed to initialize the Airbyte client")?,
    );

    info!("Ready to serve Airbyte connection status over stdio");
    if let Err(e) = StdioTransport::new(resources).run().await {
        error!("stdio transport failed: {e}");
        return Err(e.into());
    }

    info!("Airbyte MCP server stopped");
    Ok(())
}
