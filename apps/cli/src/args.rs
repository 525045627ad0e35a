//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "quill")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Inspect and maintain the encrypted credential store")]
pub(crate) struct Cli {
    /// TOML configuration file (defaults to ./quill.toml when present)
    #[arg(long, short, global = true, env = "QUILL_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Credential file, overriding `store.path`
    #[arg(long, global = true)]
    pub(crate) store: Option<PathBuf>,

    /// Environment variable holding the passphrase, overriding `store.passphrase_env`
    #[arg(long, global = true)]
    pub(crate) passphrase_env: Option<String>,

    /// Log filter, overriding `logging.level` (e.g. `debug` or `quill_vault=trace`)
    #[arg(long, global = true)]
    pub(crate) log_level: Option<String>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Show whether credentials are stored, how many and when they were saved
    Status {
        /// Print a JSON object instead of text
        #[arg(long)]
        json: bool,
    },
    /// List stored credentials without their values
    List,
    /// Upgrade a legacy plaintext file to the encrypted format
    Migrate,
    /// Delete the credential file
    Clear,
}
