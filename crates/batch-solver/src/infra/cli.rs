//! CLI arguments for the `batch-solver` binary.

use {
    clap::Parser,
    std::{net::SocketAddr, path::PathBuf},
};

/// Run the batch auction solver engine
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// The log filter.
    #[arg(long, env, default_value = "info")]
    pub log: String,

    /// Output log events as JSON.
    #[arg(long, env)]
    pub log_json: bool,

    /// The socket address to bind to.
    #[arg(long, env, default_value = "127.0.0.1:7872")]
    pub addr: SocketAddr,

    /// Path to the solver configuration file. This file should be in TOML
    /// format. Defaults are used when it is omitted.
    #[arg(long, env)]
    pub config: Option<PathBuf>,
}
