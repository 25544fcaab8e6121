use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fileprops_runtime::{default_settings_path, default_socket_path};

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    // Unix domain socket path
    pub socket_path: PathBuf,
    // JSON settings file, re-read for every connection
    pub settings_path: PathBuf,
    pub assets_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Parser)]
#[command(name = "fileprops-daemon", about = "File properties render daemon")]
pub struct Cli {
    /// Path to Unix domain socket (optional override)
    #[arg(long)]
    pub socket_path: Option<PathBuf>,

    /// Path to the settings file (optional override)
    #[arg(long = "config")]
    pub settings_path: Option<PathBuf>,

    /// Directory with icons, style sheet and script overriding the bundled ones
    #[arg(long = "assets")]
    pub assets_dir: Option<PathBuf>,

    /// Append log lines to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl DaemonConfig {
    pub fn from_args(args: &Cli) -> Result<Self> {
        let socket_path = args.socket_path.clone().unwrap_or_else(default_socket_path);
        let settings_path = args
            .settings_path
            .clone()
            .unwrap_or_else(default_settings_path);

        Ok(Self {
            socket_path,
            settings_path,
            assets_dir: args.assets_dir.clone(),
            log_file: args.log_file.clone(),
        })
    }

    pub fn from_env() -> Result<Self> {
        let args = Cli::parse();
        Self::from_args(&args)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
