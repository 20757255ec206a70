//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "ipset-exporter", version, about = "Prometheus exporter for kernel ipsets")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE", default_value = "config.yml")]
    pub config: PathBuf,
}
