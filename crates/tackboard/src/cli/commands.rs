//! # CLI Layer
//!
//! This module is the process-facing side of tackboard. It is the **only**
//! place that:
//! - Parses arguments
//! - Installs the log subscriber
//! - Prints to stdout
//!
//! Everything it calls into (`tackboardapp`) returns plain Rust values.

use super::setup::{Cli, Commands, ServeArgs};
use crate::http;
use anyhow::{Context, Result};
use clap::Parser;
use tackboardapp::config::BoardConfig;
use tackboardapp::init::{initialize, BoardContext};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let ctx = initialize(cli.data.clone()).context("failed to prepare the data directory")?;

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Paths => {
            print_paths(&ctx);
            Ok(())
        }
        Commands::Serve(args) => serve(ctx, &args).await,
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_paths(ctx: &BoardContext) {
    let paths = ctx.api.paths();
    println!("{}", paths.document.display());
    println!("{}", paths.attachments.display());
}

fn apply_overrides(mut config: BoardConfig, args: &ServeArgs) -> BoardConfig {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.no_browser {
        config.open_browser = false;
    }
    config
}

async fn serve(ctx: BoardContext, args: &ServeArgs) -> Result<()> {
    let BoardContext {
        api,
        config,
        data_root,
    } = ctx;
    let config = apply_overrides(config, args);
    let index_dir = config.index_dir(&data_root);
    http::serve(api, &config, index_dir).await
}
