use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// VoxDiff backend
#[derive(Debug, Parser)]
#[command(name = "voxdiff", about = "Voice-driven code assistant backend for editors")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "voxdiff.toml", env = "VOXDIFF_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "VOXDIFF_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter, in `tracing_subscriber::EnvFilter` syntax
    #[arg(long, default_value = "info", env = "VOXDIFF_LOG")]
    pub log_level: String,
}
