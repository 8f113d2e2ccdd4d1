use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Armature API server
#[derive(Debug, Parser)]
#[command(name = "armature", about = "HTTP API server with uniform error envelopes and JWT auth")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "armature.toml", env = "ARMATURE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "ARMATURE_LISTEN")]
    pub listen: Option<SocketAddr>,
}
