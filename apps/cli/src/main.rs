//! # Quill
//!
//! Operator tool for the encrypted credential store.

mod args;
mod handlers;

use crate::args::{Cli, Command};
use crate::handlers::{Context, conclude, user_facing};
use anyhow::{Context as _, Result};
use clap::Parser;
use quill_kernel::config::load_config;
use quill_logger::{Logger, TracingLog};
use quill_resilience::Resilience;
use quill_vault::CredentialStore;
use std::sync::Arc;

#[quill_runtime::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    if let Some(path) = cli.store {
        config.store.path = path;
    }
    if let Some(var) = cli.passphrase_env {
        config.store.passphrase_env = var;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let _log = Logger::from_config(env!("CARGO_BIN_NAME"), &config.logging)?;

    let resilience = Resilience::new(Arc::new(TracingLog::new("resilience")));
    let store = CredentialStore::from_config(&config.store, Arc::new(TracingLog::new("vault")))
        .inspect_err(|e| resilience.report(e, "startup"))
        .map_err(|e| user_facing(&e))?;

    let ctx = Context { config, store, resilience };

    let outcome = match cli.command {
        Command::Status { json } => handlers::status(&ctx, json).await,
        Command::List => handlers::list(&ctx).await,
        Command::Migrate => handlers::migrate(&ctx).await,
        Command::Clear => handlers::clear(&ctx).await,
    };

    outcome.map_err(|err| conclude(err, &ctx.resilience))
}
